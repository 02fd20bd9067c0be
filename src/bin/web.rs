//! Single binary web server: form page at `/`, JSON API under `/api`.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).
//! Search budget comes from SCHEDULE_MAX_ATTEMPTS, SCHEDULE_MAX_BACKTRACKS, SCHEDULE_TIME_LIMIT_MS
//! (30s when unset) and SCHEDULE_ROUND_ROBIN_FALLBACK.

use actix_web::{
    get, post,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use table_scheduler::{
    roster_from_teams, write_schedule_csv, Roster, Schedule, ScheduleBuilder, ScheduleOptions, Team,
};
use uuid::Uuid;

/// Stored run: roster (for labels and CSV) + schedule + last activity time (for auto-cleanup).
struct ScheduleEntry {
    roster: Roster,
    schedule: Schedule,
    last_activity: Instant,
}

/// In-memory state: finished schedules by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<Uuid, ScheduleEntry>>>;

/// Inactivity threshold: schedules not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Largest roster accepted by `POST /api/schedules`.
const MAX_TEAMS: usize = 1024;

/// Run time limit when SCHEDULE_TIME_LIMIT_MS is unset.
const DEFAULT_TIME_LIMIT_MS: u64 = 30_000;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateScheduleBody {
    teams: Vec<Team>,
    rounds: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Serialize)]
struct ScheduleResponse<'a> {
    id: Uuid,
    roster: &'a Roster,
    schedule: &'a Schedule,
}

/// Path segment: schedule id (e.g. /api/schedules/{id})
#[derive(Deserialize)]
struct SchedulePath {
    id: Uuid,
}

fn error_body(kind: &str, message: impl ToString) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string(), "kind": kind })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "table-scheduler",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Build a schedule from the posted roster. Runs on a blocking thread; nothing is stored on failure.
#[post("/api/schedules")]
async fn api_create_schedule(
    state: AppState,
    defaults: Data<ScheduleOptions>,
    body: Json<CreateScheduleBody>,
) -> HttpResponse {
    let body = body.into_inner();
    if body.teams.len() > MAX_TEAMS {
        return HttpResponse::BadRequest().json(error_body(
            "invalid_roster",
            format!("At most {} teams per schedule (got {})", MAX_TEAMS, body.teams.len()),
        ));
    }
    let teams = body
        .teams
        .into_iter()
        .map(|t| Team::new(t.id).with_attributes(t.attributes))
        .collect();
    let roster = match roster_from_teams(teams) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(error_body("invalid_roster", e)),
    };

    let mut options = defaults.get_ref().clone();
    if body.seed.is_some() {
        options.seed = body.seed;
    }
    let rounds = body.rounds;
    let ids = roster.team_ids();
    let result = tokio::task::spawn_blocking(move || {
        ScheduleBuilder::new(&ids, rounds).options(options).build()
    })
    .await;

    let schedule = match result {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => {
            log::warn!("Schedule request rejected: {}", e);
            return HttpResponse::BadRequest().json(error_body(e.kind(), e));
        }
        Err(e) => {
            log::error!("Scheduler task failed: {}", e);
            return HttpResponse::InternalServerError().body("scheduler task failed");
        }
    };

    let id = Uuid::new_v4();
    let response = HttpResponse::Ok().json(ScheduleResponse {
        id,
        roster: &roster,
        schedule: &schedule,
    });
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        ScheduleEntry {
            roster,
            schedule,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a stored schedule by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/schedules/{id}")]
async fn api_get_schedule(state: AppState, path: Path<SchedulePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(ScheduleResponse {
                id: path.id,
                roster: &entry.roster,
                schedule: &entry.schedule,
            })
        }
        None => HttpResponse::NotFound().json(error_body("not_found", "No schedule")),
    }
}

/// Download a stored schedule as CSV (one row per table).
#[get("/api/schedules/{id}/csv")]
async fn api_schedule_csv(state: AppState, path: Path<SchedulePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(error_body("not_found", "No schedule")),
    };
    entry.last_activity = Instant::now();
    let mut buf = Vec::new();
    match write_schedule_csv(&mut buf, &entry.schedule, &entry.roster) {
        Ok(()) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"schedule-{}.csv\"", path.id),
            ))
            .body(buf),
        Err(e) => HttpResponse::InternalServerError().json(error_body("export", e)),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    let mut options = ScheduleOptions::from_env();
    options.time_limit_ms.get_or_insert(DEFAULT_TIME_LIMIT_MS);
    log::info!(
        "Starting server at http://{}:{} (max {} attempts/round, {} backtracks)",
        bind.0,
        bind.1,
        options.max_attempts_per_round,
        options.max_backtracks
    );

    let state = Data::new(RwLock::new(HashMap::<Uuid, ScheduleEntry>::new()));
    let options = Data::new(options);

    // Background task: every 30 minutes, remove schedules inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive schedule(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(options.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_schedule)
            .service(api_get_schedule)
            .service(api_schedule_csv)
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
