//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CarsCommand, CarsQuery, LoginService, PaymentCommand, PaymentQuery, RentalCommand,
    RentalQuery, UsersCommand, UsersQuery,
};

/// Parameter object bundling the account and fleet ports.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Credential check and token issue.
    pub login: Arc<dyn LoginService>,
    /// Account reads.
    pub users_query: Arc<dyn UsersQuery>,
    /// Account changes.
    pub users_command: Arc<dyn UsersCommand>,
    /// Fleet reads.
    pub cars_query: Arc<dyn CarsQuery>,
    /// Fleet changes.
    pub cars_command: Arc<dyn CarsCommand>,
}

/// Parameter object bundling the booking ports.
#[derive(Clone)]
pub struct HttpStateBookingPorts {
    /// Rental lifecycle.
    pub rentals: Arc<dyn RentalCommand>,
    /// Rental reads.
    pub rentals_query: Arc<dyn RentalQuery>,
    /// Payment settlement and correction.
    pub payments: Arc<dyn PaymentCommand>,
    /// Payment reads.
    pub payments_query: Arc<dyn PaymentQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential check and token issue.
    pub login: Arc<dyn LoginService>,
    /// Account reads.
    pub users_query: Arc<dyn UsersQuery>,
    /// Account changes.
    pub users_command: Arc<dyn UsersCommand>,
    /// Fleet reads.
    pub cars_query: Arc<dyn CarsQuery>,
    /// Fleet changes.
    pub cars_command: Arc<dyn CarsCommand>,
    /// Rental lifecycle.
    pub rentals: Arc<dyn RentalCommand>,
    /// Rental reads.
    pub rentals_query: Arc<dyn RentalQuery>,
    /// Payment settlement and correction.
    pub payments: Arc<dyn PaymentCommand>,
    /// Payment reads.
    pub payments_query: Arc<dyn PaymentQuery>,
}

impl HttpState {
    /// Construct state from the account and booking port bundles.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use carhire::domain::{
    ///     AccountService, CarService, RentalService, SettlementService,
    /// };
    /// use carhire::inbound::http::state::{HttpState, HttpStateBookingPorts, HttpStatePorts};
    /// use carhire::outbound::memory::InMemoryStore;
    /// use carhire::outbound::security::{BcryptPasswordHasher, JwtTokenIssuer};
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let accounts = Arc::new(AccountService::new(
    ///     store.clone(),
    ///     Arc::new(BcryptPasswordHasher::default()),
    ///     Arc::new(JwtTokenIssuer::new("0123456789abcdef0123456789abcdef")),
    ///     clock.clone(),
    /// ));
    /// let cars = Arc::new(CarService::new(store.clone(), clock.clone()));
    /// let rentals = Arc::new(RentalService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     clock.clone(),
    /// ));
    /// let payments = Arc::new(SettlementService::new(store.clone(), store, clock));
    ///
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         login: accounts.clone(),
    ///         users_query: accounts.clone(),
    ///         users_command: accounts,
    ///         cars_query: cars.clone(),
    ///         cars_command: cars,
    ///     },
    ///     HttpStateBookingPorts {
    ///         rentals: rentals.clone(),
    ///         rentals_query: rentals,
    ///         payments: payments.clone(),
    ///         payments_query: payments,
    ///     },
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, booking: HttpStateBookingPorts) -> Self {
        let HttpStatePorts {
            login,
            users_query,
            users_command,
            cars_query,
            cars_command,
        } = ports;
        let HttpStateBookingPorts {
            rentals,
            rentals_query,
            payments,
            payments_query,
        } = booking;
        Self {
            login,
            users_query,
            users_command,
            cars_query,
            cars_command,
            rentals,
            rentals_query,
            payments,
            payments_query,
        }
    }
}
