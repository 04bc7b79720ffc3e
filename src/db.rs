use std::collections::HashMap;

use anyhow::Context;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{ContactInfo, IdentityId, RawDay, RawLogEntry, RawValue, UserRecord};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

async fn upsert_participant(
    pool: &PgPool,
    id: &str,
    display_name: &str,
    avatar: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO karbon_leaderboard.participants (id, display_name, avatar)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE
        SET display_name = EXCLUDED.display_name,
            avatar = COALESCE(EXCLUDED.avatar, karbon_leaderboard.participants.avatar)
        "#,
    )
    .bind(id)
    .bind(display_name)
    .bind(avatar)
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns whether a new log row was written.
async fn insert_log(
    pool: &PgPool,
    participant_id: &str,
    day: &str,
    value: &str,
    source_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO karbon_leaderboard.emission_logs (participant_id, day, value, source_key)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(participant_id)
    .bind(day)
    .bind(value)
    .bind(source_key)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let participants = vec![
        ("3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2", "Avery Lee", None),
        (
            "0c22f1f1-9184-4fd4-9b21-28c68a6a89dc",
            "Jules Moreno",
            Some("https://images.example.com/jules.png"),
        ),
        ("d5a0a1a2-2a3c-44c2-8f73-60b7897a9dd2", "Kiara Patel", None),
        ("8f0c1e55-6f5e-4c4f-9a53-1d2b3c4d5e6f", "Noor Haddad", None),
    ];

    for (id, name, avatar) in participants.iter() {
        upsert_participant(pool, id, name, *avatar).await?;
    }

    let logs = vec![
        ("seed-001", participants[0].0, "2026-02-02", "12.5"),
        ("seed-002", participants[0].0, "2026-02-09", "8"),
        ("seed-003", participants[1].0, "2026-01-30", "6.25"),
        ("seed-004", participants[1].0, "2026-02-03", "4.75"),
        ("seed-005", participants[2].0, "2026-02-04", "21"),
        ("seed-006", participants[2].0, "2026-02-05", "n/a"),
    ];

    for (source_key, participant_id, day, value) in logs {
        insert_log(pool, participant_id, day, value, source_key).await?;
    }

    tracing::info!(participants = participants.len(), "seeded demo participants");
    Ok(())
}

/// Bulk read of every participant with their raw logs in insertion order.
pub async fn fetch_users(pool: &PgPool) -> anyhow::Result<Vec<UserRecord>> {
    let participant_rows = sqlx::query(
        "SELECT id, display_name, avatar, bio, email, phone \
         FROM karbon_leaderboard.participants ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch participants")?;

    let log_rows = sqlx::query(
        "SELECT participant_id, day, value \
         FROM karbon_leaderboard.emission_logs ORDER BY participant_id, seq",
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch emission logs")?;

    let mut logs: HashMap<String, Vec<RawLogEntry>> = HashMap::new();
    for row in log_rows.iter() {
        let day: Option<String> = row.get("day");
        let value: Option<String> = row.get("value");
        logs.entry(row.get("participant_id"))
            .or_default()
            .push(RawLogEntry {
                day: day.map(RawDay::Text),
                value: value.map(RawValue::Text),
            });
    }

    let mut users = Vec::with_capacity(participant_rows.len());
    for row in participant_rows {
        let id: String = row.get("id");
        users.push(UserRecord {
            logs: logs.remove(&id).unwrap_or_default(),
            identity_id: IdentityId(id),
            display_name: row.get("display_name"),
            avatar: row.get("avatar"),
            contact: ContactInfo {
                bio: row.get("bio"),
                email: row.get("email"),
                phone: row.get("phone"),
            },
        });
    }

    tracing::info!(
        participants = users.len(),
        logs = log_rows.len(),
        "fetched leaderboard snapshot"
    );
    Ok(users)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        identity_id: Option<String>,
        display_name: String,
        day: String,
        value: String,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;
    // Rows without an id share one fresh id per display name within a file.
    let mut minted: HashMap<String, String> = HashMap::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let participant_id = match row.identity_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => minted
                .entry(row.display_name.clone())
                .or_insert_with(|| Uuid::new_v4().to_string())
                .clone(),
        };

        upsert_participant(pool, &participant_id, &row.display_name, None).await?;

        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        if insert_log(pool, &participant_id, &row.day, &row.value, &source_key).await? {
            inserted += 1;
        }
    }

    tracing::info!(inserted, path = %csv_path.display(), "imported emission logs");
    Ok(inserted)
}
