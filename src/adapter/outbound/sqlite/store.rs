//! SQLite tick, message and daily-bar store.
//!
//! Timestamps are stored as fixed-width RFC 3339 text (microseconds, `Z`
//! suffix) so lexical order matches chronological order in range queries.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    DailyBarRow, MessageRow, NewDailyBarRow, NewMessageRow, NewTickRow, TickRow,
};
use crate::adapter::outbound::sqlite::database::schema::{daily_bars, messages, ticks};
use crate::domain::{CurrencyPair, DailyBar, MessageRecord, TickRecord, SOURCE_SYNTHETIC};
use crate::error::{Error, Result};
use crate::port::outbound::store::{BarStore, MessageStore, TickStore};

const DATE_FORMAT: &str = "%Y-%m-%d";

type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite-backed storage for every record kind.
///
/// Each call checks out its own pooled connection, so concurrent writers
/// never share in-memory state.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<Conn> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }

    fn tick_from_row(row: TickRow) -> Result<TickRecord> {
        Ok(TickRecord::restore(
            parse_timestamp(&row.timestamp)?,
            CurrencyPair::try_new(row.currency_pair)?,
            row.price,
            row.price_type.parse()?,
            row.source_channel,
            row.raw_text,
            row.message_id,
        )?)
    }

    fn message_from_row(row: MessageRow) -> Result<MessageRecord> {
        Ok(MessageRecord {
            timestamp: parse_timestamp(&row.timestamp)?,
            channel: row.channel,
            message_id: row.message_id,
            text: row.text,
            contains_price: row.contains_price,
            sentiment: row.sentiment,
        })
    }

    fn bar_from_row(row: DailyBarRow) -> Result<DailyBar> {
        Ok(DailyBar::try_new(
            parse_date(&row.date)?,
            CurrencyPair::try_new(row.currency_pair)?,
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume,
            row.source,
        )?)
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| Error::Parse(e.to_string()))
}

#[async_trait]
impl TickStore for SqliteStore {
    async fn append_tick(&self, tick: &TickRecord) -> Result<()> {
        let row = NewTickRow {
            timestamp: format_timestamp(tick.timestamp),
            currency_pair: tick.pair.to_string(),
            price: tick.price,
            price_type: tick.price_type.to_string(),
            source_channel: tick.source_channel.clone(),
            raw_text: tick.raw_text.clone(),
            message_id: tick.message_id,
        };
        let mut conn = self.conn()?;
        diesel::insert_into(ticks::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    async fn latest_ticks(&self, pair: &CurrencyPair, limit: usize) -> Result<Vec<TickRecord>> {
        let mut conn = self.conn()?;
        let rows: Vec<TickRow> = ticks::table
            .filter(ticks::currency_pair.eq(pair.as_str()))
            .order((ticks::timestamp.desc(), ticks::id.desc()))
            .limit(limit as i64)
            .select(TickRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter().map(Self::tick_from_row).collect()
    }

    async fn ticks_between(
        &self,
        pair: &CurrencyPair,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TickRecord>> {
        let mut conn = self.conn()?;
        let rows: Vec<TickRow> = ticks::table
            .filter(ticks::currency_pair.eq(pair.as_str()))
            .filter(ticks::timestamp.ge(format_timestamp(from)))
            .filter(ticks::timestamp.le(format_timestamp(to)))
            .order((ticks::timestamp.asc(), ticks::id.asc()))
            .select(TickRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter().map(Self::tick_from_row).collect()
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    async fn append_message(&self, message: &MessageRecord) -> Result<()> {
        let row = NewMessageRow {
            timestamp: format_timestamp(message.timestamp),
            channel: message.channel.clone(),
            message_id: message.message_id,
            text: message.text.clone(),
            contains_price: message.contains_price,
            sentiment: message.sentiment,
        };
        let mut conn = self.conn()?;
        diesel::insert_into(messages::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    async fn recent_messages(
        &self,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<MessageRecord>> {
        let mut conn = self.conn()?;
        let mut query = messages::table
            .order((messages::timestamp.desc(), messages::id.desc()))
            .limit(limit as i64)
            .select(MessageRow::as_select())
            .into_boxed();
        if let Some(since) = since {
            query = query.filter(messages::timestamp.ge(format_timestamp(since)));
        }
        let rows: Vec<MessageRow> = query
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter().map(Self::message_from_row).collect()
    }
}

#[async_trait]
impl BarStore for SqliteStore {
    async fn append_bars(&self, bars: &[DailyBar]) -> Result<usize> {
        let rows: Vec<NewDailyBarRow> = bars
            .iter()
            .map(|bar| NewDailyBarRow {
                date: format_date(bar.date),
                currency_pair: bar.pair.to_string(),
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                source: bar.source.clone(),
            })
            .collect();

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let mut inserted = 0;
            for row in &rows {
                if row.source != SOURCE_SYNTHETIC {
                    diesel::delete(
                        daily_bars::table
                            .filter(daily_bars::currency_pair.eq(&row.currency_pair))
                            .filter(daily_bars::date.eq(&row.date))
                            .filter(daily_bars::source.eq(SOURCE_SYNTHETIC)),
                    )
                    .execute(conn)?;
                }
                // The unique (pair, date) index turns duplicates into no-ops.
                inserted += diesel::insert_or_ignore_into(daily_bars::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok::<_, diesel::result::Error>(inserted)
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn latest_bar_date(&self, pair: &CurrencyPair) -> Result<Option<NaiveDate>> {
        let mut conn = self.conn()?;
        let raw: Option<String> = daily_bars::table
            .filter(daily_bars::currency_pair.eq(pair.as_str()))
            .filter(daily_bars::source.ne(SOURCE_SYNTHETIC))
            .order(daily_bars::date.desc())
            .select(daily_bars::date)
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        raw.as_deref().map(parse_date).transpose()
    }

    async fn bars_between(
        &self,
        pair: &CurrencyPair,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        let mut conn = self.conn()?;
        let rows: Vec<DailyBarRow> = daily_bars::table
            .filter(daily_bars::currency_pair.eq(pair.as_str()))
            .filter(daily_bars::date.ge(format_date(from)))
            .filter(daily_bars::date.le(format_date(to)))
            .order(daily_bars::date.asc())
            .select(DailyBarRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter().map(Self::bar_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
    use crate::domain::{InboundMessage, ParsedTick, PriceType, SOURCE_FULUS};

    fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        run_migrations(&pool).unwrap();
        (dir, SqliteStore::new(pool))
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    fn tick(pair: CurrencyPair, price: f64, ts: DateTime<Utc>) -> TickRecord {
        let parsed = ParsedTick::try_new(pair, price, PriceType::Sell).unwrap();
        TickRecord::from_parsed(parsed, ts, "EwanLibya", "USD/LYD 7.1 بيع", Some(7))
    }

    fn bar(day: u32) -> DailyBar {
        bar_from(day, 7.1, SOURCE_FULUS)
    }

    fn bar_from(day: u32, close: f64, source: &str) -> DailyBar {
        DailyBar::try_new(
            NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            CurrencyPair::usd_lyd(),
            7.0,
            7.2,
            6.9,
            close,
            Some(250_000.0),
            source,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ticks_round_trip_and_order() {
        let (_dir, store) = store();
        let usd = CurrencyPair::usd_lyd();
        store.append_tick(&tick(usd.clone(), 7.1, at(9))).await.unwrap();
        store.append_tick(&tick(usd.clone(), 7.3, at(11))).await.unwrap();
        store.append_tick(&tick(usd.clone(), 7.2, at(10))).await.unwrap();
        store.append_tick(&tick(CurrencyPair::eur_lyd(), 7.9, at(12))).await.unwrap();

        let latest = store.latest_ticks(&usd, 2).await.unwrap();
        assert_eq!(latest.iter().map(|t| t.price).collect::<Vec<_>>(), vec![7.3, 7.2]);
        assert_eq!(latest[0].price_type, PriceType::Sell);
        assert_eq!(latest[0].message_id, Some(7));
        assert_eq!(latest[0].timestamp, at(11));

        let window = store.ticks_between(&usd, at(9), at(10)).await.unwrap();
        assert_eq!(window.iter().map(|t| t.price).collect::<Vec<_>>(), vec![7.1, 7.2]);
    }

    #[tokio::test]
    async fn subsecond_timestamps_sort_chronologically() {
        let (_dir, store) = store();
        let usd = CurrencyPair::usd_lyd();
        let base = at(9);
        store.append_tick(&tick(usd.clone(), 7.1, base + TimeDelta::milliseconds(500))).await.unwrap();
        store.append_tick(&tick(usd.clone(), 7.2, base + TimeDelta::seconds(1))).await.unwrap();

        let latest = store.latest_ticks(&usd, 1).await.unwrap();
        assert_eq!(latest[0].price, 7.2);
    }

    #[tokio::test]
    async fn messages_filter_by_since_and_limit() {
        let (_dir, store) = store();
        for (i, hour) in [8, 9, 10, 11].into_iter().enumerate() {
            let msg = MessageRecord::from_inbound(
                &InboundMessage::new("AlMushir", i as i64, format!("message {i}")),
                at(hour),
                i % 2 == 0,
            );
            store.append_message(&msg).await.unwrap();
        }

        let recent = store.recent_messages(Some(at(9)), 10).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].text, "message 3");

        let limited = store.recent_messages(None, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert!(limited[1].contains_price);
    }

    #[tokio::test]
    async fn bars_skip_existing_dates() {
        let (_dir, store) = store();
        let usd = CurrencyPair::usd_lyd();

        assert_eq!(store.append_bars(&[bar(1), bar(2)]).await.unwrap(), 2);
        assert_eq!(store.append_bars(&[bar(2), bar(3)]).await.unwrap(), 1);

        assert_eq!(
            store.latest_bar_date(&usd).await.unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 3)
        );
        let bars = store
            .bars_between(&usd, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(), NaiveDate::from_ymd_opt(2025, 3, 31).unwrap())
            .await
            .unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].volume, Some(250_000.0));
        assert!(store.latest_bar_date(&CurrencyPair::eur_lyd()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn real_bars_replace_synthetic_ones() {
        let (_dir, store) = store();
        let usd = CurrencyPair::usd_lyd();

        let synthetic = [bar_from(1, 4.8, SOURCE_SYNTHETIC), bar_from(2, 4.9, SOURCE_SYNTHETIC)];
        assert_eq!(store.append_bars(&synthetic).await.unwrap(), 2);
        assert!(store.latest_bar_date(&usd).await.unwrap().is_none());

        // Synthetic never overwrites real data.
        assert_eq!(store.append_bars(&[bar(2)]).await.unwrap(), 1);
        assert_eq!(store.append_bars(&[bar_from(2, 5.0, SOURCE_SYNTHETIC)]).await.unwrap(), 0);

        assert_eq!(
            store.latest_bar_date(&usd).await.unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 2)
        );
        let bars = store
            .bars_between(&usd, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].is_synthetic());
        assert!(!bars[1].is_synthetic());
        assert_eq!(bars[1].close, 7.1);
    }
}
