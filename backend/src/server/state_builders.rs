//! Builders wiring repositories and security adapters into HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use carhire::domain::ports::{
    CarRepository, PasswordHasher, PaymentRepository, RentalRepository, TokenIssuer,
    UserRepository,
};
use carhire::domain::{AccountService, CarService, RentalService, SettlementService};
use carhire::inbound::http::state::{HttpState, HttpStateBookingPorts, HttpStatePorts};
use carhire::outbound::persistence::{
    DbPool, DieselCarRepository, DieselPaymentRepository, DieselRentalRepository,
    DieselUserRepository,
};
use carhire::outbound::security::{BcryptPasswordHasher, JwtTokenIssuer};

/// Account service backed by PostgreSQL, bcrypt and HS256 tokens.
pub(crate) type PgAccounts =
    AccountService<DieselUserRepository, BcryptPasswordHasher, JwtTokenIssuer>;

/// Repository handles shared by every service.
pub(crate) struct Repositories<U, C, R, P> {
    pub users: Arc<U>,
    pub cars: Arc<C>,
    pub rentals: Arc<R>,
    pub payments: Arc<P>,
}

impl Repositories<
    DieselUserRepository,
    DieselCarRepository,
    DieselRentalRepository,
    DieselPaymentRepository,
> {
    pub(crate) fn postgres(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            cars: Arc::new(DieselCarRepository::new(pool.clone())),
            rentals: Arc::new(DieselRentalRepository::new(pool.clone())),
            payments: Arc::new(DieselPaymentRepository::new(pool.clone())),
        }
    }
}

/// Assemble HTTP state from repositories and security adapters.
///
/// The account service is returned alongside the state so start-up can run
/// administrator provisioning against the same instance.
pub(crate) fn build_http_state<U, C, R, P, H, T>(
    repos: Repositories<U, C, R, P>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
) -> (HttpState, Arc<AccountService<U, H, T>>)
where
    U: UserRepository + 'static,
    C: CarRepository + 'static,
    R: RentalRepository + 'static,
    P: PaymentRepository + 'static,
    H: PasswordHasher + 'static,
    T: TokenIssuer + 'static,
{
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&repos.users),
        hasher,
        tokens,
        Arc::clone(&clock),
    ));
    let cars = Arc::new(CarService::new(Arc::clone(&repos.cars), Arc::clone(&clock)));
    let rentals = Arc::new(RentalService::new(
        Arc::clone(&repos.users),
        Arc::clone(&repos.cars),
        Arc::clone(&repos.rentals),
        Arc::clone(&clock),
    ));
    let payments = Arc::new(SettlementService::new(repos.rentals, repos.payments, clock));

    let state = HttpState::new(
        HttpStatePorts {
            login: accounts.clone(),
            users_query: accounts.clone(),
            users_command: accounts.clone(),
            cars_query: cars.clone(),
            cars_command: cars,
        },
        HttpStateBookingPorts {
            rentals: rentals.clone(),
            rentals_query: rentals,
            payments: payments.clone(),
            payments_query: payments,
        },
    );
    (state, accounts)
}

/// Production wiring over a PostgreSQL pool.
pub(crate) fn build_postgres_state(
    pool: &DbPool,
    jwt_secret: &str,
) -> (HttpState, Arc<PgAccounts>) {
    build_http_state(
        Repositories::postgres(pool),
        Arc::new(BcryptPasswordHasher::default()),
        Arc::new(JwtTokenIssuer::new(jwt_secret)),
        Arc::new(DefaultClock),
    )
}
