//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{daily_bars, messages, ticks};

/// Database row for a tick (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = ticks)]
pub struct NewTickRow {
    pub timestamp: String,
    pub currency_pair: String,
    pub price: f64,
    pub price_type: String,
    pub source_channel: String,
    pub raw_text: String,
    pub message_id: Option<i64>,
}

/// Database row for a tick (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = ticks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TickRow {
    pub id: Option<i32>,
    pub timestamp: String,
    pub currency_pair: String,
    pub price: f64,
    pub price_type: String,
    pub source_channel: String,
    pub raw_text: String,
    pub message_id: Option<i64>,
}

/// Database row for a message (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = messages)]
pub struct NewMessageRow {
    pub timestamp: String,
    pub channel: String,
    pub message_id: i64,
    pub text: String,
    pub contains_price: bool,
    pub sentiment: Option<f64>,
}

/// Database row for a message (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MessageRow {
    pub id: Option<i32>,
    pub timestamp: String,
    pub channel: String,
    pub message_id: i64,
    pub text: String,
    pub contains_price: bool,
    pub sentiment: Option<f64>,
}

/// Database row for a daily bar (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = daily_bars)]
pub struct NewDailyBarRow {
    pub date: String,
    pub currency_pair: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
    pub source: String,
}

/// Database row for a daily bar (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = daily_bars)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyBarRow {
    pub id: Option<i32>,
    pub date: String,
    pub currency_pair: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
    pub source: String,
}
