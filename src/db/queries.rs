use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Inquiry, InquiryStatus, NewInquiry, Therapist};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Therapists ──

const THERAPIST_COLUMNS: &str =
    "id, name, specialties, accepted_insurance, google_refresh_token, created_at";

pub fn create_therapist(
    conn: &Connection,
    name: &str,
    specialties: &[String],
    accepted_insurance: &[String],
) -> anyhow::Result<Therapist> {
    let id = uuid::Uuid::new_v4().to_string();
    let specialties_json = serde_json::to_string(specialties)?;
    let insurance_json = serde_json::to_string(accepted_insurance)?;

    conn.execute(
        "INSERT INTO therapists (id, name, specialties, accepted_insurance) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, specialties_json, insurance_json],
    )?;

    get_therapist(conn, &id)?
        .ok_or_else(|| anyhow::anyhow!("therapist {id} missing after insert"))
}

pub fn get_therapist(conn: &Connection, id: &str) -> anyhow::Result<Option<Therapist>> {
    let sql = format!("SELECT {THERAPIST_COLUMNS} FROM therapists WHERE id = ?1");
    let row = conn
        .query_row(&sql, params![id], |row| Ok(parse_therapist_row(row)))
        .optional()?;
    row.transpose()
}

/// All therapists in insertion order; the matcher relies on this order.
pub fn list_therapists(conn: &Connection) -> anyhow::Result<Vec<Therapist>> {
    let sql = format!("SELECT {THERAPIST_COLUMNS} FROM therapists ORDER BY created_at ASC, rowid ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_therapist_row(row)))?;

    let mut therapists = vec![];
    for row in rows {
        therapists.push(row??);
    }
    Ok(therapists)
}

pub fn set_therapist_refresh_token(
    conn: &Connection,
    id: &str,
    refresh_token: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE therapists SET google_refresh_token = ?1 WHERE id = ?2",
        params![refresh_token, id],
    )?;
    Ok(count > 0)
}

fn parse_therapist_row(row: &rusqlite::Row) -> anyhow::Result<Therapist> {
    let specialties_json: String = row.get(2)?;
    let insurance_json: String = row.get(3)?;
    let created_at_str: String = row.get(5)?;

    Ok(Therapist {
        id: row.get(0)?,
        name: row.get(1)?,
        specialties: serde_json::from_str(&specialties_json).unwrap_or_default(),
        accepted_insurance: serde_json::from_str(&insurance_json).unwrap_or_default(),
        google_refresh_token: row.get(4)?,
        created_at: parse_timestamp(&created_at_str),
    })
}

// ── Inquiries ──

const INQUIRY_COLUMNS: &str = "id, patient_identifier, problem_description, requested_schedule, \
     insurance_info, extracted_specialty, matched_therapist_id, status, created_at";

/// Inserts one row and reads it back so the caller sees the storage-assigned `created_at`.
pub fn insert_inquiry(conn: &Connection, inquiry: &NewInquiry) -> anyhow::Result<Inquiry> {
    conn.execute(
        "INSERT INTO inquiries (id, patient_identifier, problem_description, requested_schedule,
                                insurance_info, extracted_specialty, matched_therapist_id, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            inquiry.id,
            inquiry.patient_identifier,
            inquiry.problem_description,
            inquiry.requested_schedule,
            inquiry.insurance_info,
            inquiry.extracted_specialty,
            inquiry.matched_therapist_id,
            inquiry.status.as_str(),
        ],
    )?;

    get_inquiry(conn, &inquiry.id)?
        .ok_or_else(|| anyhow::anyhow!("inquiry {} missing after insert", inquiry.id))
}

pub fn get_inquiry(conn: &Connection, id: &str) -> anyhow::Result<Option<Inquiry>> {
    let sql = format!("SELECT {INQUIRY_COLUMNS} FROM inquiries WHERE id = ?1");
    let row = conn
        .query_row(&sql, params![id], |row| Ok(parse_inquiry_row(row)))
        .optional()?;
    row.transpose()
}

pub fn list_inquiries(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Inquiry>> {
    let mut inquiries = vec![];

    if let Some(status) = status_filter {
        let sql = format!(
            "SELECT {INQUIRY_COLUMNS} FROM inquiries WHERE status = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![status, limit], |row| Ok(parse_inquiry_row(row)))?;
        for row in rows {
            inquiries.push(row??);
        }
    } else {
        let sql = format!(
            "SELECT {INQUIRY_COLUMNS} FROM inquiries ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit], |row| Ok(parse_inquiry_row(row)))?;
        for row in rows {
            inquiries.push(row??);
        }
    }

    Ok(inquiries)
}

pub fn count_inquiries(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM inquiries", [], |row| row.get(0))?;
    Ok(count)
}

fn parse_inquiry_row(row: &rusqlite::Row) -> anyhow::Result<Inquiry> {
    let status_str: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;

    Ok(Inquiry {
        id: row.get(0)?,
        patient_identifier: row.get(1)?,
        problem_description: row.get(2)?,
        requested_schedule: row.get(3)?,
        insurance_info: row.get(4)?,
        extracted_specialty: row.get(5)?,
        matched_therapist_id: row.get(6)?,
        status: InquiryStatus::parse(&status_str),
        created_at: parse_timestamp(&created_at_str),
    })
}

fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}
