//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate with `diesel print-schema` or
//! update by hand.

diesel::table! {
    /// Registered accounts. `email` carries a unique index.
    users (id) {
        id -> Uuid,
        full_name -> Varchar,
        /// Lower-cased login address.
        email -> Varchar,
        /// bcrypt hash; never leaves the persistence layer unhashed.
        password_hash -> Varchar,
        phone -> Varchar,
        /// `admin` or `customer`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rentable vehicles.
    cars (id) {
        id -> Uuid,
        brand -> Varchar,
        model -> Varchar,
        year -> Int4,
        license_plate -> Varchar,
        /// Strictly positive daily rate.
        price_per_day -> Numeric,
        /// `available`, `rented` or `maintenance`.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bookings. `user_id` and `car_id` reference `users` and `cars`
    /// without cascading, so referenced rows cannot be deleted.
    rentals (id) {
        id -> Uuid,
        user_id -> Uuid,
        car_id -> Uuid,
        start_date -> Timestamptz,
        end_date -> Timestamptz,
        total_price -> Numeric,
        /// `unpaid` or `paid`.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One payment per rental. `rental_id` is unique and cascades on delete.
    payments (id) {
        id -> Uuid,
        rental_id -> Uuid,
        amount -> Numeric,
        /// Empty until settlement.
        method -> Nullable<Varchar>,
        status -> Varchar,
        created_at -> Timestamptz,
        paid_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(payments -> rentals (rental_id));
diesel::joinable!(rentals -> cars (car_id));
diesel::joinable!(rentals -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, cars, rentals, payments);
