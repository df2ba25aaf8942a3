//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use actix_web::test::TestRequest;

use crate::domain::ports::{
    MockCarsCommand, MockCarsQuery, MockLoginService, MockPaymentCommand, MockPaymentQuery,
    MockRentalCommand, MockRentalQuery, MockUsersCommand, MockUsersQuery,
};
use crate::domain::{AuthenticatedUser, Role, UserId};
use crate::inbound::http::state::{HttpState, HttpStateBookingPorts, HttpStatePorts};

/// Bearer token accepted by [`HttpStateBuilder::authenticated_as`].
pub const TEST_TOKEN: &str = "test-token";

/// Builds an [`HttpState`] from mock ports.
///
/// Ports left unset are mocks without expectations, so any unexpected call
/// fails the test.
#[derive(Default)]
pub struct HttpStateBuilder {
    login: MockLoginService,
    users_query: MockUsersQuery,
    users_command: MockUsersCommand,
    cars_query: MockCarsQuery,
    cars_command: MockCarsCommand,
    rentals: MockRentalCommand,
    rentals_query: MockRentalQuery,
    payments: MockPaymentCommand,
    payments_query: MockPaymentQuery,
}

impl HttpStateBuilder {
    /// Replace the login port mock.
    pub fn login(mut self, login: MockLoginService) -> Self {
        self.login = login;
        self
    }

    /// Accept [`TEST_TOKEN`] as `user_id` with `role`.
    pub fn authenticated_as(mut self, user_id: UserId, role: Role) -> Self {
        self.login
            .expect_authenticate()
            .withf(|token| token == TEST_TOKEN)
            .returning(move |_| Ok(AuthenticatedUser { user_id, role }));
        self
    }

    /// Replace the users query port mock.
    pub fn users_query(mut self, port: MockUsersQuery) -> Self {
        self.users_query = port;
        self
    }

    /// Replace the users command port mock.
    pub fn users_command(mut self, port: MockUsersCommand) -> Self {
        self.users_command = port;
        self
    }

    /// Replace the cars query port mock.
    pub fn cars_query(mut self, port: MockCarsQuery) -> Self {
        self.cars_query = port;
        self
    }

    /// Replace the cars command port mock.
    pub fn cars_command(mut self, port: MockCarsCommand) -> Self {
        self.cars_command = port;
        self
    }

    /// Replace the rental command port mock.
    pub fn rentals(mut self, port: MockRentalCommand) -> Self {
        self.rentals = port;
        self
    }

    /// Replace the rental query port mock.
    pub fn rentals_query(mut self, port: MockRentalQuery) -> Self {
        self.rentals_query = port;
        self
    }

    /// Replace the payment command port mock.
    pub fn payments(mut self, port: MockPaymentCommand) -> Self {
        self.payments = port;
        self
    }

    /// Replace the payment query port mock.
    pub fn payments_query(mut self, port: MockPaymentQuery) -> Self {
        self.payments_query = port;
        self
    }

    /// Assemble the HTTP state from the configured mocks.
    pub fn build(self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                login: Arc::new(self.login),
                users_query: Arc::new(self.users_query),
                users_command: Arc::new(self.users_command),
                cars_query: Arc::new(self.cars_query),
                cars_command: Arc::new(self.cars_command),
            },
            HttpStateBookingPorts {
                rentals: Arc::new(self.rentals),
                rentals_query: Arc::new(self.rentals_query),
                payments: Arc::new(self.payments),
                payments_query: Arc::new(self.payments_query),
            },
        )
    }
}

/// Attach the test bearer token to a request under construction.
pub fn with_bearer(req: TestRequest) -> TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {TEST_TOKEN}")))
}
