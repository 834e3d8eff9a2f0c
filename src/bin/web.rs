//! Single binary web server: JSON API for the group stage, static front-end from STATIC_DIR.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Environment: HOST, PORT, DATA_DIR (tournament documents), STATIC_DIR,
//! SESSION_KEY (at least 64 bytes), COOKIE_SECURE (true/false).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    http::StatusCode,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use volley_tournament_web::{
    compute_standings, generate_tournament, parse_score_input, parse_team_names, record_set_score,
    schedule_csv, standings_csv, JsonFileStore, MatchResult, Side, StorageError, TeamStanding,
    Tournament, TournamentConfig, TournamentId, TournamentStore,
};

/// Session key holding the browser's tournament id.
const SESSION_TOURNAMENT: &str = "tournament_id";

/// Inactivity threshold: cached tournaments not accessed for this long are evicted (they stay on disk).
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

type SharedStore = Arc<dyn TournamentStore + Send + Sync>;

/// Cached tournament + last activity time (for eviction).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Mutex<Instant>,
    /// Set when the cached copy has edits the store does not hold yet.
    dirty: bool,
}

impl TournamentEntry {
    fn new(tournament: Tournament, dirty: bool) -> Self {
        Self {
            tournament,
            last_activity: Mutex::new(Instant::now()),
            dirty,
        }
    }

    fn touch(&self) {
        if let Ok(mut at) = self.last_activity.lock() {
            *at = Instant::now();
        }
    }

    fn idle_for(&self) -> Duration {
        self.last_activity
            .lock()
            .map(|at| at.elapsed())
            .unwrap_or_default()
    }
}

struct AppState {
    active: RwLock<HashMap<TournamentId, TournamentEntry>>,
    store: SharedStore,
}

type State = Data<AppState>;

/// Server settings read from the environment.
struct Config {
    host: String,
    port: u16,
    data_dir: String,
    static_dir: String,
    session_key: Key,
    cookie_secure: bool,
}

impl Config {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());
        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);
        let session_key = match std::env::var("SESSION_KEY") {
            Ok(raw) => Key::try_from(raw.as_bytes()).unwrap_or_else(|_| {
                log::warn!("SESSION_KEY shorter than 64 bytes; using a random key");
                Key::generate()
            }),
            Err(_) => {
                log::warn!("SESSION_KEY not set; sessions will not survive a restart");
                Key::generate()
            }
        };
        Self {
            host,
            port,
            data_dir,
            static_dir,
            session_key,
            cookie_secure,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Team names as typed into the textarea (one per line) or as a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum TeamNamesInput {
    Text(String),
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    num_teams: usize,
    team_names: TeamNamesInput,
    num_groups: usize,
    #[serde(default)]
    assign_refs: bool,
    #[serde(default)]
    shorten_group_stage: bool,
}

impl GenerateBody {
    fn into_config(self) -> TournamentConfig {
        let team_names = match self.team_names {
            TeamNamesInput::Text(raw) => parse_team_names(&raw),
            TeamNamesInput::List(names) => names,
        };
        TournamentConfig {
            num_teams: self.num_teams,
            team_names,
            num_groups: self.num_groups,
            assign_refs: self.assign_refs,
            shorten_group_stage: self.shorten_group_stage,
        }
    }
}

#[derive(Deserialize)]
struct ScoreBody {
    side: Side,
    /// Raw field content; blank clears the score.
    value: String,
}

/// Path segments: group index (e.g. /api/tournament/groups/{group}/standings)
#[derive(Deserialize)]
struct GroupPath {
    group: usize,
}

/// Path segments: group, match and set indices (all zero-based).
#[derive(Deserialize)]
struct SetPath {
    group: usize,
    match_index: usize,
    set: usize,
}

/// Tournament plus the current standings of every group.
#[derive(Serialize)]
struct TournamentView<'a> {
    tournament: &'a Tournament,
    standings: Vec<Vec<TeamStanding>>,
}

impl<'a> TournamentView<'a> {
    fn new(tournament: &'a Tournament) -> Self {
        let mode = tournament.scoring_mode();
        let standings = tournament
            .groups
            .iter()
            .map(|g| compute_standings(g, mode))
            .collect();
        Self { tournament, standings }
    }
}

#[derive(Serialize)]
struct ScoreResponse {
    result: MatchResult,
    standings: Vec<TeamStanding>,
}

fn error_body(e: impl Display) -> serde_json::Value {
    serde_json::json!({ "error": e.to_string() })
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(error_body("No tournament data found. Please generate groups first."))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// 507 for a full store, 500 otherwise.
fn storage_status(e: &StorageError) -> StatusCode {
    match e {
        StorageError::Full => StatusCode::INSUFFICIENT_STORAGE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn storage_error(e: StorageError) -> HttpResponse {
    HttpResponse::build(storage_status(&e)).json(error_body(e))
}

fn session_tournament(session: &Session) -> Option<TournamentId> {
    session.get::<TournamentId>(SESSION_TOURNAMENT).ok().flatten()
}

/// Run a store call on the blocking thread pool, never under the cache lock.
async fn blocking<R, F>(store: &SharedStore, f: F) -> Result<R, StorageError>
where
    F: FnOnce(&dyn TournamentStore) -> Result<R, StorageError> + Send + 'static,
    R: Send + 'static,
{
    let store = Arc::clone(store);
    web::block(move || f(&*store))
        .await
        .map_err(|e| StorageError::Io(e.to_string()))?
}

/// Save a snapshot. The cached entry is marked clean only if it still equals what was written.
async fn persist(state: &AppState, snapshot: Tournament) -> Result<(), StorageError> {
    let store = Arc::clone(&state.store);
    let (snapshot, saved) = web::block(move || {
        let saved = store.save(&snapshot);
        (snapshot, saved)
    })
    .await
    .map_err(|e| StorageError::Io(e.to_string()))?;
    if saved.is_ok() {
        if let Ok(mut g) = state.active.write() {
            if let Some(entry) = g.get_mut(&snapshot.id) {
                if entry.tournament == snapshot {
                    entry.dirty = false;
                }
            }
        }
    }
    saved
}

/// Make sure `id` is cached, loading it from the store on a miss. `Ok(false)` if it exists nowhere.
async fn ensure_cached(state: &AppState, id: TournamentId) -> Result<bool, HttpResponse> {
    {
        let g = state.active.read().map_err(|_| lock_error())?;
        if let Some(entry) = g.get(&id) {
            entry.touch();
            return Ok(true);
        }
    }
    let loaded = blocking(&state.store, move |store| store.load(id))
        .await
        .map_err(storage_error)?;
    let Some(tournament) = loaded else {
        return Ok(false);
    };
    let mut g = state.active.write().map_err(|_| lock_error())?;
    g.entry(id)
        .or_insert_with(|| {
            log::info!("Loaded tournament {} from storage", id);
            TournamentEntry::new(tournament, false)
        })
        .touch();
    Ok(true)
}

/// Answer from the session's tournament under the read lock.
async fn with_tournament<F>(state: &AppState, session: &Session, f: F) -> HttpResponse
where
    F: FnOnce(&Tournament) -> HttpResponse,
{
    let Some(id) = session_tournament(session) else {
        return no_tournament();
    };
    match ensure_cached(state, id).await {
        Ok(true) => {}
        Ok(false) => return no_tournament(),
        Err(resp) => return resp,
    }
    let g = match state.active.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&id) {
        Some(entry) => f(&entry.tournament),
        // Cleared or evicted since it was loaded.
        None => no_tournament(),
    }
}

/// Snapshots of dirty entries idle for at least `idle`.
fn unsaved_idle(state: &AppState, idle: Duration) -> Vec<Tournament> {
    match state.active.read() {
        Ok(g) => g
            .values()
            .filter(|entry| entry.dirty && entry.idle_for() >= idle)
            .map(|entry| entry.tournament.clone())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Drop clean entries idle for at least `idle`; returns how many went.
fn evict_clean(state: &AppState, idle: Duration) -> usize {
    let Ok(mut g) = state.active.write() else {
        return 0;
    };
    let before = g.len();
    g.retain(|_, entry| entry.dirty || entry.idle_for() < idle);
    before - g.len()
}

/// Retry saving idle unsaved tournaments, then evict the idle ones that are safely stored.
async fn evict_idle(state: &AppState, idle: Duration) -> usize {
    for snapshot in unsaved_idle(state, idle) {
        let id = snapshot.id;
        match persist(state, snapshot).await {
            Ok(()) => log::info!("Saved tournament {} before eviction", id),
            Err(e) => log::warn!("Keeping unsaved tournament {} in cache: {}", id, e),
        }
    }
    evict_clean(state, idle)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "volley-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Generate groups, fixtures and referees; replaces the session's previous tournament.
#[post("/api/tournament")]
async fn api_generate(state: State, session: Session, body: Json<GenerateBody>) -> HttpResponse {
    let config = body.into_inner().into_config();
    let tournament = match generate_tournament(&config) {
        Ok(t) => t,
        Err(e) => return HttpResponse::BadRequest().json(error_body(e)),
    };

    let previous = session_tournament(&session);
    if let Err(e) = session.insert(SESSION_TOURNAMENT, tournament.id) {
        return HttpResponse::InternalServerError().json(error_body(e));
    }
    {
        let mut g = match state.active.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        if let Some(old) = previous {
            g.remove(&old);
        }
        g.insert(tournament.id, TournamentEntry::new(tournament.clone(), true));
    }
    if let Some(old) = previous {
        if let Err(e) = blocking(&state.store, move |store| store.clear(old)).await {
            log::warn!("Could not clear previous tournament {}: {}", old, e);
        }
    }

    match persist(&state, tournament.clone()).await {
        Ok(()) => HttpResponse::Ok().json(TournamentView::new(&tournament)),
        Err(e) => {
            log::error!("Saving tournament {} failed: {}", tournament.id, e);
            HttpResponse::build(storage_status(&e)).json(serde_json::json!({
                "error": e.to_string(),
                "tournament": tournament,
            }))
        }
    }
}

/// The session's tournament with current standings (404 if none).
#[get("/api/tournament")]
async fn api_get_tournament(state: State, session: Session) -> HttpResponse {
    with_tournament(&state, &session, |t| HttpResponse::Ok().json(TournamentView::new(t))).await
}

/// Edit one score field: rescore the match, recompute the group's standings, save.
#[put("/api/tournament/groups/{group}/matches/{match_index}/sets/{set}")]
async fn api_set_score(state: State, session: Session, path: Path<SetPath>, body: Json<ScoreBody>) -> HttpResponse {
    let Some(id) = session_tournament(&session) else {
        return no_tournament();
    };
    match ensure_cached(&state, id).await {
        Ok(true) => {}
        Ok(false) => return no_tournament(),
        Err(resp) => return resp,
    }

    let (result, standings, snapshot) = {
        let mut g = match state.active.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let Some(entry) = g.get_mut(&id) else {
            return no_tournament();
        };
        let t = &mut entry.tournament;

        let score = match parse_score_input(&body.value) {
            Ok(score) => score,
            Err(e) => {
                // Client reverts the field to this value.
                let previous = t
                    .groups
                    .get(path.group)
                    .and_then(|grp| grp.matches.get(path.match_index))
                    .and_then(|m| m.results.sets.get(path.set))
                    .and_then(|set| set[body.side.index()]);
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": e.to_string(),
                    "previous": previous,
                }));
            }
        };

        let result = match record_set_score(t, path.group, path.match_index, path.set, body.side, score) {
            Ok(r) => r,
            Err(e) => return HttpResponse::BadRequest().json(error_body(e)),
        };
        let mode = t.scoring_mode();
        let standings = match t.group(path.group) {
            Ok(grp) => compute_standings(grp, mode),
            Err(e) => return HttpResponse::BadRequest().json(error_body(e)),
        };
        entry.dirty = true;
        (result, standings, entry.tournament.clone())
    };

    match persist(&state, snapshot).await {
        Ok(()) => HttpResponse::Ok().json(ScoreResponse { result, standings }),
        Err(e) => {
            log::error!("Saving tournament {} failed: {}", id, e);
            HttpResponse::build(storage_status(&e)).json(serde_json::json!({
                "error": e.to_string(),
                "result": result,
                "standings": standings,
            }))
        }
    }
}

/// Standings of one group as JSON.
#[get("/api/tournament/groups/{group}/standings")]
async fn api_group_standings(state: State, session: Session, path: Path<GroupPath>) -> HttpResponse {
    with_tournament(&state, &session, |t| match t.group(path.group) {
        Ok(grp) => HttpResponse::Ok().json(compute_standings(grp, t.scoring_mode())),
        Err(e) => HttpResponse::NotFound().json(error_body(e)),
    })
    .await
}

/// Standings of one group as CSV download.
#[get("/api/tournament/groups/{group}/standings.csv")]
async fn api_group_standings_csv(state: State, session: Session, path: Path<GroupPath>) -> HttpResponse {
    with_tournament(&state, &session, |t| {
        let mode = t.scoring_mode();
        let csv = t
            .group(path.group)
            .and_then(|grp| standings_csv(&compute_standings(grp, mode), mode));
        match csv {
            Ok(body) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(body),
            Err(e) => HttpResponse::BadRequest().json(error_body(e)),
        }
    })
    .await
}

/// Match schedule of one group (with referees and entered scores) as CSV.
#[get("/api/tournament/groups/{group}/schedule.csv")]
async fn api_group_schedule_csv(state: State, session: Session, path: Path<GroupPath>) -> HttpResponse {
    with_tournament(&state, &session, |t| match t.group(path.group).and_then(schedule_csv) {
        Ok(body) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(body),
        Err(e) => HttpResponse::BadRequest().json(error_body(e)),
    })
    .await
}

/// Clear all tournament data of this session.
#[delete("/api/tournament")]
async fn api_clear_tournament(state: State, session: Session) -> HttpResponse {
    let Some(id) = session_tournament(&session) else {
        return HttpResponse::Ok().json(serde_json::json!({ "cleared": false }));
    };
    match state.active.write() {
        Ok(mut g) => {
            g.remove(&id);
        }
        Err(_) => return lock_error(),
    }
    session.remove(SESSION_TOURNAMENT);
    match blocking(&state.store, move |store| store.clear(id)).await {
        Ok(()) => {
            log::info!("Cleared tournament {}", id);
            HttpResponse::Ok().json(serde_json::json!({ "cleared": true }))
        }
        Err(e) => storage_error(e),
    }
}

fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(cookie_secure)
        .build()
}

/// JSON API routes (static files are mounted separately).
fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(favicon)
        .service(api_generate)
        .service(api_get_tournament)
        .service(api_set_score)
        .service(api_group_standings_csv)
        .service(api_group_schedule_csv)
        .service(api_group_standings)
        .service(api_clear_tournament);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let store = JsonFileStore::open(&config.data_dir).map_err(std::io::Error::other)?;
    log::info!("Storing tournaments in {}", store.dir().display());
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(AppState {
        active: RwLock::new(HashMap::new()),
        store: Arc::new(store),
    });

    // Background task: every 30 minutes, evict cached tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let removed = evict_idle(&state_cleanup, INACTIVITY_TIMEOUT).await;
            if removed > 0 {
                log::info!("Evicted {} inactive tournament(s) from cache (no activity for 12h)", removed);
            }
        }
    });

    let session_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;
    let static_dir = config.static_dir.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(session_key.clone(), cookie_secure))
            .configure(api_routes)
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::dev::ServiceResponse;
    use actix_web::test::{self, TestRequest};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, Ordering};
    use volley_tournament_web::MemoryStore;

    /// Memory store that reports a full disk while `full` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        full: AtomicBool,
    }

    impl TournamentStore for FlakyStore {
        fn load(&self, id: TournamentId) -> Result<Option<Tournament>, StorageError> {
            self.inner.load(id)
        }

        fn save(&self, tournament: &Tournament) -> Result<(), StorageError> {
            if self.full.load(Ordering::SeqCst) {
                return Err(StorageError::Full);
            }
            self.inner.save(tournament)
        }

        fn clear(&self, id: TournamentId) -> Result<(), StorageError> {
            self.inner.clear(id)
        }
    }

    fn app_state(store: Arc<FlakyStore>) -> State {
        Data::new(AppState {
            active: RwLock::new(HashMap::new()),
            store,
        })
    }

    /// Four teams in one group; the first match is A vs D.
    fn generate_request() -> TestRequest {
        TestRequest::post().uri("/api/tournament").set_json(json!({
            "numTeams": 4,
            "teamNames": "A\nB\nC\nD",
            "numGroups": 1,
            "assignRefs": true,
        }))
    }

    fn score_request(cookie: &Cookie<'static>, set: usize, side: &str, value: &str) -> TestRequest {
        TestRequest::put()
            .uri(&format!("/api/tournament/groups/0/matches/0/sets/{}", set))
            .cookie(cookie.clone())
            .set_json(json!({ "side": side, "value": value }))
    }

    fn get_request(cookie: &Cookie<'static>) -> TestRequest {
        TestRequest::get().uri("/api/tournament").cookie(cookie.clone())
    }

    fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
        resp.response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned()
    }

    fn tournament_id(body: &Value) -> TournamentId {
        body["tournament"]["id"].as_str().unwrap().parse().unwrap()
    }

    #[actix_web::test]
    async fn generate_accepts_camel_case_body() {
        let state = app_state(Arc::new(FlakyStore::default()));
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(session_middleware(Key::generate(), false))
                .configure(api_routes),
        )
        .await;

        let resp = test::call_service(&app, generate_request().to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["tournament"]["numTeams"], json!(4));
        assert_eq!(body["tournament"]["assignRefs"], json!(true));
        let first = &body["tournament"]["groups"][0]["matches"][0];
        assert_eq!(first["team1"], json!("A"));
        assert_eq!(first["team2"], json!("D"));
        assert_eq!(first["referee"], json!("B"));
        assert_eq!(body["standings"][0].as_array().unwrap().len(), 4);

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/tournament")
                .set_json(json!({ "numTeams": 4, "teamNames": "A\nB", "numGroups": 1 }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn invalid_score_returns_previous_value_and_keeps_match() {
        let state = app_state(Arc::new(FlakyStore::default()));
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(session_middleware(Key::generate(), false))
                .configure(api_routes),
        )
        .await;

        let resp = test::call_service(&app, generate_request().to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = session_cookie(&resp);

        let resp = test::call_service(&app, score_request(&cookie, 0, "one", " 21 ").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        for bad in ["-3", "abc"] {
            let resp = test::call_service(&app, score_request(&cookie, 0, "one", bad).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["previous"], json!(21));
            assert!(body["error"].is_string());
        }

        // Nothing entered yet: the client clears the field.
        let resp = test::call_service(&app, score_request(&cookie, 0, "two", "2.5").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["previous"], Value::Null);

        let resp = test::call_service(&app, get_request(&cookie).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let results = &body["tournament"]["groups"][0]["matches"][0]["results"];
        assert_eq!(results["sets"], json!([[21, null], [null, null], [null, null]]));
        assert_eq!(results["is_complete"], json!(false));
    }

    #[actix_web::test]
    async fn valid_edit_returns_rescored_result_and_standings() {
        let store = Arc::new(FlakyStore::default());
        let state = app_state(store.clone());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(session_middleware(Key::generate(), false))
                .configure(api_routes),
        )
        .await;

        let resp = test::call_service(&app, generate_request().to_request()).await;
        let cookie = session_cookie(&resp);
        let body: Value = test::read_body_json(resp).await;
        let id = tournament_id(&body);

        let resp = test::call_service(&app, score_request(&cookie, 0, "one", "21").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["result"]["team1_sets_won"], json!(0));

        let mut last = Value::Null;
        for (set, side, value) in [(0, "two", "15"), (1, "one", "21"), (1, "two", "18")] {
            let resp = test::call_service(&app, score_request(&cookie, set, side, value).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
            last = test::read_body_json(resp).await;
        }

        let result = &last["result"];
        assert_eq!(result["is_complete"], json!(true));
        assert_eq!(result["team1_sets_won"], json!(2));
        assert_eq!(result["team1_match_points"], json!(3));
        assert_eq!(result["team2_match_points"], json!(0));
        assert_eq!(result["team1_point_diff"], json!(9));
        assert_eq!(result["team2_point_diff"], json!(-9));

        let standings = last["standings"].as_array().unwrap();
        assert_eq!(standings.len(), 4);
        assert_eq!(standings[0]["teamName"], json!("A"));
        assert_eq!(standings[0]["matchPoints"], json!(3));
        assert_eq!(standings[0]["gamesPlayed"], json!(1));
        assert_eq!(standings[0]["pointDifference"], json!(9));
        assert_eq!(standings[3]["teamName"], json!("D"));
        assert_eq!(standings[3]["pointDifference"], json!(-9));

        let stored = store.load(id).unwrap().unwrap();
        assert!(stored.groups[0].matches[0].results.is_complete);
        assert!(!state.active.read().unwrap()[&id].dirty);
    }

    #[actix_web::test]
    async fn failed_save_reports_507_and_keeps_edit_in_memory() {
        let store = Arc::new(FlakyStore::default());
        let state = app_state(store.clone());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(session_middleware(Key::generate(), false))
                .configure(api_routes),
        )
        .await;

        let resp = test::call_service(&app, generate_request().to_request()).await;
        let cookie = session_cookie(&resp);
        let body: Value = test::read_body_json(resp).await;
        let id = tournament_id(&body);

        store.full.store(true, Ordering::SeqCst);
        let resp = test::call_service(&app, score_request(&cookie, 0, "one", "25").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INSUFFICIENT_STORAGE);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
        assert_eq!(body["result"]["sets"][0], json!([25, null]));
        assert_eq!(body["standings"].as_array().unwrap().len(), 4);

        let resp = test::call_service(&app, get_request(&cookie).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["tournament"]["groups"][0]["matches"][0]["results"]["sets"][0],
            json!([25, null])
        );

        let stored = store.load(id).unwrap().unwrap();
        assert_eq!(stored.groups[0].matches[0].results.sets[0], [None, None]);
        assert!(state.active.read().unwrap()[&id].dirty);
    }

    #[actix_web::test]
    async fn eviction_keeps_unsaved_tournaments_until_a_save_succeeds() {
        let store = Arc::new(FlakyStore::default());
        let state = app_state(store.clone());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(session_middleware(Key::generate(), false))
                .configure(api_routes),
        )
        .await;

        let resp = test::call_service(&app, generate_request().to_request()).await;
        let cookie = session_cookie(&resp);
        let body: Value = test::read_body_json(resp).await;
        let id = tournament_id(&body);

        store.full.store(true, Ordering::SeqCst);
        let resp = test::call_service(&app, score_request(&cookie, 0, "one", "25").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INSUFFICIENT_STORAGE);

        assert_eq!(evict_idle(&state, Duration::ZERO).await, 0);
        assert!(state.active.read().unwrap().contains_key(&id));

        store.full.store(false, Ordering::SeqCst);
        assert_eq!(evict_idle(&state, Duration::ZERO).await, 1);
        assert!(!state.active.read().unwrap().contains_key(&id));

        // Reloaded from the store with the edit intact.
        let resp = test::call_service(&app, get_request(&cookie).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["tournament"]["groups"][0]["matches"][0]["results"]["sets"][0],
            json!([25, null])
        );
    }
}
