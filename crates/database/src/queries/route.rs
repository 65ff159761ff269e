use model::route::{Route, RouteType};
use sqlx::FromRow;
use utility::id::Id;

#[derive(FromRow)]
struct RouteRow {
    id: String,
    short_name: Option<String>,
    long_name: Option<String>,
    route_type: String,
}

fn route_type_to_str(route_type: RouteType) -> &'static str {
    match route_type {
        RouteType::TramOrLightRail => "tram_or_light_rail",
        RouteType::Subway => "subway",
        RouteType::Rail => "rail",
        RouteType::Bus => "bus",
        RouteType::Ferry => "ferry",
        RouteType::CableTram => "cable_tram",
        RouteType::AerialLift => "aerial_lift",
        RouteType::Funicular => "funicular",
        RouteType::Trolleybus => "trolleybus",
        RouteType::Monorail => "monorail",
        RouteType::Other => "other",
    }
}

fn route_type_from_str(value: &str) -> RouteType {
    match value {
        "tram_or_light_rail" => RouteType::TramOrLightRail,
        "subway" => RouteType::Subway,
        "rail" => RouteType::Rail,
        "bus" => RouteType::Bus,
        "ferry" => RouteType::Ferry,
        "cable_tram" => RouteType::CableTram,
        "aerial_lift" => RouteType::AerialLift,
        "funicular" => RouteType::Funicular,
        "trolleybus" => RouteType::Trolleybus,
        "monorail" => RouteType::Monorail,
        _ => RouteType::Other,
    }
}

impl From<RouteRow> for Route {
    fn from(row: RouteRow) -> Self {
        Route {
            id: Id::new(row.id),
            short_name: row.short_name,
            long_name: row.long_name,
            route_type: route_type_from_str(&row.route_type),
        }
    }
}

pub async fn list(pool: &sqlx::PgPool) -> Result<Vec<Route>, sqlx::Error> {
    let rows: Vec<RouteRow> = sqlx::query_as(
        "SELECT id, short_name, long_name, route_type FROM routes ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Route::from).collect())
}

pub async fn upsert_all(
    conn: &mut sqlx::PgConnection,
    routes: &[Route],
) -> Result<(), sqlx::Error> {
    for route in routes {
        sqlx::query(
            "INSERT INTO routes (id, short_name, long_name, route_type) VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET short_name = EXCLUDED.short_name,
                long_name = EXCLUDED.long_name, route_type = EXCLUDED.route_type",
        )
        .bind(route.id.raw())
        .bind(&route.short_name)
        .bind(&route.long_name)
        .bind(route_type_to_str(route.route_type))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
