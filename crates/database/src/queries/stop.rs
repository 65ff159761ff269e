use model::stop::Stop;
use sqlx::{FromRow, PgPool};
use utility::id::Id;

#[derive(FromRow)]
struct StopRow {
    id: String,
    name: String,
    latitude: f64,
    longitude: f64,
}

impl From<StopRow> for Stop {
    fn from(row: StopRow) -> Self {
        Stop {
            id: Id::new(row.id),
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

pub async fn list(pool: &PgPool) -> Result<Vec<Stop>, sqlx::Error> {
    let rows: Vec<StopRow> =
        sqlx::query_as("SELECT id, name, latitude, longitude FROM stops ORDER BY id")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(Stop::from).collect())
}

pub async fn upsert_all(
    conn: &mut sqlx::PgConnection,
    stops: &[Stop],
) -> Result<(), sqlx::Error> {
    for stop in stops {
        sqlx::query(
            "INSERT INTO stops (id, name, latitude, longitude) VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name,
                latitude = EXCLUDED.latitude, longitude = EXCLUDED.longitude",
        )
        .bind(stop.id.raw())
        .bind(&stop.name)
        .bind(stop.latitude)
        .bind(stop.longitude)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
