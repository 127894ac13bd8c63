use crate::util::{enum_text, json_text, parse_enum, parse_json, parse_timestamp, timestamp};
use revu_core::error::{EventError, RevuError};
use revu_core::events::EventRepository;
use revu_events::EventRecord;
use rusqlite::Connection;
use ulid::Ulid;

pub struct EventRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> EventRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> EventRepository for EventRepo<'a> {
    fn append(&self, mut event: EventRecord) -> Result<EventRecord, RevuError> {
        event.seq = next_seq(self.conn)?;
        event.id = format!("evt_{}", Ulid::new());

        let sql = "INSERT INTO events (id, seq, at, correlation_id, source, body_json) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
        let params = (
            event.id.clone(),
            event.seq,
            timestamp(&event.at),
            event.correlation_id.clone(),
            enum_text(&event.source).map_err(|err| RevuError::Internal {
                message: err.to_string(),
            })?,
            json_text(&event.body).map_err(|err| RevuError::Internal {
                message: err.to_string(),
            })?,
        );
        self.conn.execute(sql, params).map_err(|err| {
            RevuError::Event(EventError::InvalidInput {
                message: err.to_string(),
            })
        })?;
        Ok(event)
    }

    fn list(
        &self,
        after: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<EventRecord>, RevuError> {
        let mut sql = "SELECT id, seq, at, correlation_id, source, body_json FROM events"
            .to_string();
        if after.is_some() {
            sql.push_str(" WHERE seq > ?1");
        }
        sql.push_str(" ORDER BY seq ASC");
        if limit.is_some() {
            sql.push_str(if after.is_some() { " LIMIT ?2" } else { " LIMIT ?1" });
        }

        let mut stmt = self.conn.prepare(&sql).map_err(|err| {
            RevuError::Event(EventError::InvalidInput {
                message: err.to_string(),
            })
        })?;
        let invalid = |err: rusqlite::Error| {
            RevuError::Event(EventError::InvalidInput {
                message: err.to_string(),
            })
        };
        let mut rows = match (after, limit) {
            (Some(after), Some(limit)) => stmt
                .query(rusqlite::params![after, limit])
                .map_err(invalid)?,
            (Some(after), None) => stmt.query(rusqlite::params![after]).map_err(invalid)?,
            (None, Some(limit)) => stmt.query(rusqlite::params![limit]).map_err(invalid)?,
            (None, None) => stmt.query([]).map_err(invalid)?,
        };
        let mut events = Vec::new();
        while let Some(row) = rows.next().map_err(invalid)? {
            events.push(map_event_row(row)?);
        }
        Ok(events)
    }
}

fn map_event_row(row: &rusqlite::Row<'_>) -> Result<EventRecord, RevuError> {
    let invalid = |err: &dyn std::fmt::Display| {
        RevuError::Event(EventError::InvalidInput {
            message: err.to_string(),
        })
    };

    let id: String = row.get(0).map_err(|err| invalid(&err))?;
    let seq: i64 = row.get(1).map_err(|err| invalid(&err))?;
    let at: String = row.get(2).map_err(|err| invalid(&err))?;
    let correlation_id: Option<String> = row.get(3).map_err(|err| invalid(&err))?;
    let source: String = row.get(4).map_err(|err| invalid(&err))?;
    let body_json: String = row.get(5).map_err(|err| invalid(&err))?;

    Ok(EventRecord {
        id,
        seq,
        at: parse_timestamp("at", &at).map_err(|err| invalid(&err))?,
        correlation_id,
        source: parse_enum("source", &source).map_err(|err| invalid(&err))?,
        body: parse_json("body_json", &body_json).map_err(|err| invalid(&err))?,
    })
}

fn next_seq(conn: &Connection) -> Result<i64, RevuError> {
    let mut stmt = conn
        .prepare("SELECT COALESCE(MAX(seq), 0) FROM events")
        .map_err(|err| {
            RevuError::Event(EventError::InvalidInput {
                message: err.to_string(),
            })
        })?;
    let seq: i64 = stmt.query_row([], |row| row.get(0)).map_err(|err| {
        RevuError::Event(EventError::InvalidInput {
            message: err.to_string(),
        })
    })?;
    Ok(seq + 1)
}
