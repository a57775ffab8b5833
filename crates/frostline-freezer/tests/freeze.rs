//! End-to-end freeze tests against in-process axum applications.

use std::{
    fs,
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{Extension, http::StatusCode, routing::get};
use frostline_core::{FreezerConfig, GeneratorErrorPolicy, RouteDedup, RouteSpec, StatusPolicy};
use frostline_freezer::{
    AxumHost, FreezeError, Freezer, FrozenState, Host, HostError, HostResponse, Outcome,
};
use frostline_router::{Route, RouteTable, SharedUrlGenerator, UrlGenerator};
use http::Method;
use tempfile::TempDir;

fn site() -> AxumHost {
    AxumHost::new()
        .route("home", "/", get(|| async { "<h1>Home</h1>" }))
        .unwrap()
        .route("hello", "/hello", get(|| async { "<h1>Hello</h1>" }))
        .unwrap()
}

fn config(dir: &TempDir) -> FreezerConfig {
    FreezerConfig::default().with_destination(dir.path().join("build"))
}

/// Relative paths of every file below `root`, sorted.
fn files(root: &Path) -> Vec<String> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                out.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    let mut out = Vec::new();
    if root.exists() {
        walk(root, root, &mut out);
    }
    out.sort();
    out
}

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[tokio::test]
async fn test_freeze_writes_every_route() {
    let dir = TempDir::new().unwrap();
    let build = dir.path().join("build");

    let mut freezer = Freezer::new(site(), config(&dir));
    let stats = freezer.freeze().await.unwrap();

    assert_eq!(files(&build), vec!["hello.html", "index.html"]);
    assert_eq!(
        fs::read_to_string(build.join("index.html")).unwrap(),
        "<h1>Home</h1>"
    );
    assert_eq!(
        fs::read_to_string(build.join("hello.html")).unwrap(),
        "<h1>Hello</h1>"
    );
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.routes, 2);
    assert!(freezer.host().is_booted());
}

#[tokio::test]
async fn test_freeze_url_twice_fetches_once() {
    let dir = TempDir::new().unwrap();
    let hits = counter();
    let host = AxumHost::new()
        .route(
            "hello",
            "/hello",
            get({
                let hits = hits.clone();
                move || async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "hello"
                }
            }),
        )
        .unwrap();

    let freezer = Freezer::new(host, config(&dir));
    let mut state = FrozenState::new();

    let first = freezer.freeze_url("/hello", &mut state).await;
    let second = freezer.freeze_url("/hello", &mut state).await;

    assert_eq!(first, Outcome::Frozen(dir.path().join("build/hello.html")));
    assert_eq!(second, Outcome::AlreadyFrozen);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(state.should_skip_url("/hello"));
}

#[tokio::test]
async fn test_two_names_one_url_write_once() {
    let dir = TempDir::new().unwrap();
    let hits = counter();
    let handler = {
        let hits = hits.clone();
        move || async move {
            hits.fetch_add(1, Ordering::SeqCst);
            "page one"
        }
    };
    let host = AxumHost::new()
        .named(
            Route::new("blog", "/blog/page/{page}")
                .unwrap()
                .with_default("page", "1"),
            get(handler.clone()),
        )
        .unwrap()
        .route("blog_first", "/blog/page/1", get(handler))
        .unwrap();

    let mut freezer = Freezer::new(host, config(&dir));
    let stats = freezer.freeze().await.unwrap();

    assert_eq!(files(&dir.path().join("build")), vec!["blog/page/1.html"]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(stats.pages, 1);
    assert_eq!(stats.routes, 2);
}

#[tokio::test]
async fn test_generators_dispatch_in_priority_order() {
    let dir = TempDir::new().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let handler = {
        let seen = seen.clone();
        move |uri: axum::http::Uri| async move {
            seen.lock().unwrap().push(uri.to_string());
            "ok"
        }
    };
    let host = AxumHost::new()
        .route("home", "/", get(handler.clone()))
        .unwrap()
        .unnamed("/fifty", get(handler.clone()))
        .unwrap()
        .unnamed("/hundred-and-one", get(handler))
        .unwrap();

    let mut freezer = Freezer::new(host, config(&dir));
    freezer
        .register_generator(|| vec![RouteSpec::url("/fifty")], 50)
        .register_generator(|| vec![RouteSpec::url("/hundred-and-one")], 100);

    assert_eq!(freezer.registry().priorities(), vec![50, 100, 101]);

    freezer.freeze().await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["/fifty", "/", "/hundred-and-one"]
    );
}

#[tokio::test]
async fn test_unknown_route_does_not_stop_the_pass() {
    let dir = TempDir::new().unwrap();
    let mut freezer = Freezer::new(site(), config(&dir));
    freezer.register_generator(
        || {
            vec![
                RouteSpec::named("removed_route"),
                RouteSpec::named("hello").with_param("lang", "de"),
            ]
        },
        10,
    );

    let stats = freezer.freeze().await.unwrap();

    assert_eq!(
        files(&dir.path().join("build")),
        vec!["hello.html", "index.html"]
    );
    assert_eq!(stats.skipped, 1);
}

#[tokio::test]
async fn test_missing_parameter_route_is_skipped() {
    let dir = TempDir::new().unwrap();
    let host = site()
        .route(
            "show_user",
            "/users/{id}",
            get(|| async { "user" }),
        )
        .unwrap();

    let mut freezer = Freezer::new(host, config(&dir));
    let stats = freezer.freeze().await.unwrap();

    assert_eq!(
        files(&dir.path().join("build")),
        vec!["hello.html", "index.html"]
    );
    assert_eq!(stats.skipped, 1);
}

#[tokio::test]
async fn test_rejected_url_can_be_retried_in_the_same_pass() {
    let dir = TempDir::new().unwrap();
    let hits = counter();
    let host = AxumHost::new()
        .unnamed(
            "/flaky",
            get({
                let hits = hits.clone();
                move || async move {
                    if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                        (StatusCode::SERVICE_UNAVAILABLE, "try later")
                    } else {
                        (StatusCode::OK, "recovered")
                    }
                }
            }),
        )
        .unwrap();

    let freezer = Freezer::new(host, config(&dir));
    let mut state = FrozenState::new();
    let target = dir.path().join("build/flaky.html");

    let first = freezer.freeze_url("/flaky", &mut state).await;
    assert_eq!(first, Outcome::Rejected(503));
    assert!(!target.exists());
    assert!(!state.should_skip_url("/flaky"));

    let second = freezer.freeze_url("/flaky", &mut state).await;
    assert_eq!(second, Outcome::Frozen(target.clone()));
    assert_eq!(fs::read_to_string(target).unwrap(), "recovered");
}

#[tokio::test]
async fn test_route_with_failed_fetch_is_not_retried() {
    let dir = TempDir::new().unwrap();
    let host = AxumHost::new()
        .route(
            "gone",
            "/gone",
            get(|| async { (StatusCode::NOT_FOUND, "missing") }),
        )
        .unwrap();

    let freezer = Freezer::new(host, config(&dir));
    let mut state = FrozenState::new();
    let params = Default::default();

    assert_eq!(
        freezer.freeze_route("gone", &params, &mut state).await,
        Outcome::Rejected(404)
    );
    assert_eq!(
        freezer.freeze_route("gone", &params, &mut state).await,
        Outcome::AlreadyFrozen
    );
    assert!(!dir.path().join("build/gone.html").exists());
}

#[tokio::test]
async fn test_non_ok_success_needs_policy() {
    let host = || {
        AxumHost::new()
            .route(
                "created",
                "/created",
                get(|| async { (StatusCode::CREATED, "made") }),
            )
            .unwrap()
    };

    let strict = TempDir::new().unwrap();
    let stats = Freezer::new(host(), config(&strict))
        .freeze()
        .await
        .unwrap();
    assert_eq!(stats.rejected, 1);
    assert!(files(&strict.path().join("build")).is_empty());

    let lenient = TempDir::new().unwrap();
    let config = FreezerConfig {
        accept_status: StatusPolicy::Success,
        ..config(&lenient)
    };
    let stats = Freezer::new(host(), config).freeze().await.unwrap();
    assert_eq!(stats.pages, 1);
    assert_eq!(
        files(&lenient.path().join("build")),
        vec!["created.html"]
    );
}

#[tokio::test]
async fn test_panicking_handler_is_isolated() {
    let dir = TempDir::new().unwrap();
    let host = site()
        .route(
            "broken",
            "/broken",
            get(|| async {
                if true {
                    panic!("template missing");
                }
                "never"
            }),
        )
        .unwrap();

    let mut freezer = Freezer::new(host, config(&dir));
    let stats = freezer.freeze().await.unwrap();

    assert_eq!(stats.rejected, 1);
    assert_eq!(
        files(&dir.path().join("build")),
        vec!["hello.html", "index.html"]
    );
}

fn linking_site() -> AxumHost {
    AxumHost::new()
        .route(
            "home",
            "/",
            get(|Extension(urls): Extension<SharedUrlGenerator>| async move {
                let about = urls.path("about").unwrap_or_default();
                format!(r#"<a href="{about}">About</a>"#)
            }),
        )
        .unwrap()
        .route("about", "/about/", get(|| async { "about us" }))
        .unwrap()
}

#[tokio::test]
async fn test_linked_routes_are_discovered() {
    let dir = TempDir::new().unwrap();
    let mut freezer = Freezer::new(linking_site(), config(&dir).exclude_route("about"));

    let stats = freezer.freeze().await.unwrap();

    let build = dir.path().join("build");
    assert_eq!(files(&build), vec!["about/index.html", "index.html"]);
    assert_eq!(
        fs::read_to_string(build.join("index.html")).unwrap(),
        r#"<a href="/about/">About</a>"#
    );
    assert_eq!(stats.discovered, 1);
}

#[tokio::test]
async fn test_single_url_freezes_its_links() {
    let dir = TempDir::new().unwrap();
    let freezer = Freezer::new(linking_site(), config(&dir));
    let mut state = FrozenState::new();

    let outcome = freezer.freeze_url("/", &mut state).await;

    let build = dir.path().join("build");
    assert_eq!(outcome, Outcome::Frozen(build.join("index.html")));
    assert_eq!(files(&build), vec!["about/index.html", "index.html"]);
    assert!(state.should_skip_route("about"));
    assert!(state.should_skip_url("/about/"));
}

#[tokio::test]
async fn test_single_spec_freezes_its_links() {
    let dir = TempDir::new().unwrap();
    let freezer = Freezer::new(linking_site(), config(&dir));
    let mut state = FrozenState::new();

    let outcome = freezer
        .freeze_spec(&RouteSpec::named("home"), &mut state)
        .await;

    assert!(matches!(outcome, Outcome::Frozen(_)));
    assert_eq!(
        files(&dir.path().join("build")),
        vec!["about/index.html", "index.html"]
    );
    assert_eq!(state.route_count(), 2);
}

#[tokio::test]
async fn test_repeated_links_are_discovered_once() {
    let dir = TempDir::new().unwrap();
    let host = AxumHost::new()
        .route(
            "home",
            "/",
            get(|Extension(urls): Extension<SharedUrlGenerator>| async move {
                let about = urls.path("about").unwrap_or_default();
                format!(r#"<a href="{about}">About</a> <a href="{about}">More</a>"#)
            }),
        )
        .unwrap()
        .route(
            "about",
            "/about/",
            get(|Extension(urls): Extension<SharedUrlGenerator>| async move {
                let home = urls.path("home").unwrap_or_default();
                format!(r#"<a href="{home}">Back</a>"#)
            }),
        )
        .unwrap();

    let mut freezer = Freezer::new(host, config(&dir).exclude_route("about"));
    let stats = freezer.freeze().await.unwrap();

    assert_eq!(stats.pages, 2);
    assert_eq!(stats.discovered, 1);
}

#[tokio::test]
async fn test_discovery_disabled_without_override() {
    let dir = TempDir::new().unwrap();
    let config = FreezerConfig {
        override_url_generator: false,
        ..config(&dir).exclude_route("about")
    };
    let mut freezer = Freezer::new(linking_site(), config);

    let stats = freezer.freeze().await.unwrap();

    assert_eq!(files(&dir.path().join("build")), vec!["index.html"]);
    assert_eq!(stats.discovered, 0);
}

#[tokio::test]
async fn test_failing_generator_is_skipped_by_default() {
    let dir = TempDir::new().unwrap();
    let mut freezer = Freezer::new(site(), config(&dir));
    freezer.register_generator(
        || -> Result<Vec<RouteSpec>, std::io::Error> {
            Err(std::io::Error::other("users table unavailable"))
        },
        10,
    );

    let stats = freezer.freeze().await.unwrap();

    assert_eq!(stats.generator_failures, 1);
    assert_eq!(stats.pages, 2);
}

#[tokio::test]
async fn test_failing_generator_aborts_when_configured() {
    let dir = TempDir::new().unwrap();
    let config = FreezerConfig {
        on_generator_error: GeneratorErrorPolicy::Abort,
        ..config(&dir)
    };
    let mut freezer = Freezer::new(site(), config);
    freezer.register_generator(
        || -> Result<Vec<RouteSpec>, std::io::Error> {
            Err(std::io::Error::other("users table unavailable"))
        },
        10,
    );

    let err = freezer.freeze().await.unwrap_err();

    assert!(matches!(err, FreezeError::Generator { priority: 10, .. }));
    assert!(files(&dir.path().join("build")).is_empty());
}

#[tokio::test]
async fn test_uncreatable_destination_is_fatal() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let config = FreezerConfig::default().with_destination(blocker.join("build"));
    let err = Freezer::new(site(), config).freeze().await.unwrap_err();

    assert!(matches!(err, FreezeError::Destination { .. }));
}

#[tokio::test]
async fn test_each_freeze_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let mut freezer = Freezer::new(site(), config(&dir));

    let first = freezer.freeze().await.unwrap();
    fs::remove_file(dir.path().join("build/hello.html")).unwrap();
    let second = freezer.freeze().await.unwrap();

    assert_eq!(first.pages, 2);
    assert_eq!(second.pages, 2);
    assert!(dir.path().join("build/hello.html").exists());
}

#[tokio::test]
async fn test_route_dedupe_by_reference() {
    let users = || {
        AxumHost::new()
            .named(
                Route::new("show_user", "/users/{id}")
                    .unwrap()
                    .with_requirement("id", r"\d+")
                    .unwrap(),
                get(|axum::extract::Path(id): axum::extract::Path<String>| async move {
                    format!("user {id}")
                }),
            )
            .unwrap()
    };
    let generator = || {
        ["1", "2", "x"]
            .into_iter()
            .map(|id| RouteSpec::named("show_user").with_param("id", id))
            .collect::<Vec<_>>()
    };

    let by_name = TempDir::new().unwrap();
    let mut freezer = Freezer::new(users(), config(&by_name));
    freezer.register_generator(generator, 10);
    freezer.freeze().await.unwrap();
    assert_eq!(files(&by_name.path().join("build")), vec!["users/1.html"]);

    let by_reference = TempDir::new().unwrap();
    let config = FreezerConfig {
        dedupe_routes_by: RouteDedup::Reference,
        ..config(&by_reference)
    };
    let mut freezer = Freezer::new(users(), config);
    freezer.register_generator(generator, 10);
    let stats = freezer.freeze().await.unwrap();

    assert_eq!(
        files(&by_reference.path().join("build")),
        vec!["users/1.html", "users/2.html"]
    );
    assert_eq!(stats.skipped, 2);
    assert_eq!(
        fs::read_to_string(by_reference.path().join("build/users/2.html")).unwrap(),
        "user 2"
    );
}

#[tokio::test]
async fn test_query_string_is_dropped_from_file_name() {
    let dir = TempDir::new().unwrap();
    let mut freezer = Freezer::new(site(), config(&dir).exclude_route("hello"));
    freezer.register_generator(|| vec![RouteSpec::url("/hello?lang=en")], 10);

    freezer.freeze().await.unwrap();

    assert_eq!(
        files(&dir.path().join("build")),
        vec!["hello.html", "index.html"]
    );
}

struct OfflineHost;

impl Host for OfflineHost {
    fn routes(&self) -> Arc<RouteTable> {
        Arc::new(RouteTable::new())
    }

    fn boot(&mut self) -> Result<(), HostError> {
        Err(HostError::Boot("database offline".to_string()))
    }

    fn isolate_failures(&mut self, _enabled: bool) {}

    fn install_url_generator(&mut self, _generator: SharedUrlGenerator) {}

    async fn dispatch(&self, _method: Method, uri: &str) -> Result<HostResponse, HostError> {
        panic!("no request expected, got {uri}");
    }
}

#[tokio::test]
async fn test_boot_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = Freezer::new(OfflineHost, config(&dir))
        .freeze()
        .await
        .unwrap_err();

    assert!(matches!(err, FreezeError::Boot(_)));
    assert!(err.to_string().contains("database offline"));
    assert!(!dir.path().join("build").exists());
}
