//! Helpers for populating a throwaway database with a useful cast of characters.

use arcana_common::Cents;

use crate::db_types::{Addon, Gig, Profile, Role};
use crate::helpers::ids;
use crate::sqlite::db::{gigs, profiles, sessions};
use crate::SqliteDatabase;

/// A structurally valid CPF for test buyers.
pub const VALID_CPF: &str = "52998224725";
pub const TEST_CELLPHONE: &str = "+5511999990000";

/// A client with complete billing details, ready to check out.
pub async fn seed_client(db: &SqliteDatabase, id: &str) -> Profile {
    let mut conn = db.pool().acquire().await.unwrap();
    let email = format!("{id}@example.com");
    profiles::insert_profile(id, Role::Client, "Test Client", &email, &mut conn).await.unwrap();
    profiles::update_billing_details(id, Some(VALID_CPF), Some(TEST_CELLPHONE), None, &mut conn)
        .await
        .unwrap()
        .unwrap()
}

/// A client with no CPF or cellphone on file.
pub async fn seed_bare_client(db: &SqliteDatabase, id: &str) -> Profile {
    let mut conn = db.pool().acquire().await.unwrap();
    let email = format!("{id}@example.com");
    profiles::insert_profile(id, Role::Client, "Bare Client", &email, &mut conn).await.unwrap()
}

/// A reader with a registered PIX key.
pub async fn seed_reader(db: &SqliteDatabase, id: &str) -> Profile {
    let mut conn = db.pool().acquire().await.unwrap();
    let email = format!("{id}@example.com");
    profiles::insert_profile(id, Role::Reader, "Test Reader", &email, &mut conn).await.unwrap();
    profiles::update_billing_details(id, None, None, Some("test-reader@pix.example.com"), &mut conn)
        .await
        .unwrap()
        .unwrap()
}

pub async fn seed_gig(db: &SqliteDatabase, gig_id: &str, reader_id: &str, price: i64) -> Gig {
    let mut conn = db.pool().acquire().await.unwrap();
    gigs::insert_gig(gig_id, reader_id, "Three card spread", Cents::from(price), &mut conn).await.unwrap()
}

pub async fn seed_addon(db: &SqliteDatabase, addon_id: &str, gig_id: &str, price: i64) -> Addon {
    let mut conn = db.pool().acquire().await.unwrap();
    gigs::insert_addon(addon_id, gig_id, "Extra card", Cents::from(price), &mut conn).await.unwrap()
}

pub async fn set_order_caps(db: &SqliteDatabase, profile_id: &str, per_day: i64, simultaneous: i64) {
    let mut conn = db.pool().acquire().await.unwrap();
    profiles::set_order_caps(profile_id, per_day, simultaneous, &mut conn).await.unwrap().unwrap();
}

/// Opens a session for the profile and returns the bearer token.
pub async fn seed_session(db: &SqliteDatabase, profile_id: &str) -> String {
    let mut conn = db.pool().acquire().await.unwrap();
    let token = ids::session_token();
    sessions::insert_session(&token, profile_id, &mut conn).await.unwrap();
    token
}
