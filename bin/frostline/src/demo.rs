//! The demo application frozen by the CLI.
//!
//! A small blog whose pages link to each other through the URL generator, so
//! a freeze picks up linked pages even when they are excluded from the
//! default route list.

use axum::{
    Extension,
    extract::Path,
    http::StatusCode,
    response::Html,
    routing::get,
};
use frostline_core::{Params, RouteSpec};
use frostline_freezer::{AxumHost, Freezer, Host};
use frostline_router::{Route, RouteError, RouteTable, SharedUrlGenerator, UrlGenerator};

/// A blog post of the demo application.
#[derive(Debug, Clone, Copy)]
pub struct Post {
    /// URL slug.
    pub slug: &'static str,
    /// Post title.
    pub title: &'static str,
    /// Post body.
    pub body: &'static str,
}

/// Posts served by the demo application.
pub const POSTS: &[Post] = &[
    Post {
        slug: "hello-world",
        title: "Hello, world",
        body: "The first post, rendered once and served forever.",
    },
    Post {
        slug: "frozen-routes",
        title: "Frozen routes",
        body: "Every named route becomes a file under the destination directory.",
    },
    Post {
        slug: "linked-pages",
        title: "Linked pages",
        body: "Pages linked through the URL generator are frozen in the same pass.",
    },
];

/// Build the demo application.
pub fn app() -> Result<AxumHost, RouteError> {
    AxumHost::new()
        .route("home", "/", get(home))?
        .route("about", "/about/", get(about))?
        .route("post_index", "/posts/", get(post_index))?
        .named(
            Route::new("post", "/posts/{slug}")?.with_requirement("slug", "[a-z0-9-]+")?,
            get(post),
        )
}

/// Register the generators the demo application needs beyond its named
/// routes: one URL per post, since `post` takes a parameter.
pub fn register_generators(freezer: &mut Freezer<AxumHost>) {
    let routes = freezer.host().routes();
    freezer.register_generator(move || post_urls(&routes), 50);
}

fn post_urls(routes: &RouteTable) -> Result<Vec<RouteSpec>, RouteError> {
    POSTS
        .iter()
        .map(|post| routes.generate("post", &slug_params(post.slug)).map(RouteSpec::url))
        .collect()
}

fn slug_params(slug: &str) -> Params {
    Params::from([("slug".to_string(), slug.to_string())])
}

fn layout(urls: &SharedUrlGenerator, title: &str, content: &str) -> Html<String> {
    let home = urls.path("home").unwrap_or_default();
    let about = urls.path("about").unwrap_or_default();
    let posts = urls.path("post_index").unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<nav><a href="{home}">Home</a> <a href="{posts}">Posts</a> <a href="{about}">About</a></nav>
<main>
<h1>{title}</h1>
{content}
</main>
</body>
</html>
"#
    ))
}

async fn home(Extension(urls): Extension<SharedUrlGenerator>) -> Html<String> {
    layout(&urls, "Frostline", "<p>A site frozen from a running application.</p>")
}

async fn about(Extension(urls): Extension<SharedUrlGenerator>) -> Html<String> {
    layout(&urls, "About", "<p>Built with axum, written to disk by frostline.</p>")
}

async fn post_index(Extension(urls): Extension<SharedUrlGenerator>) -> Html<String> {
    let items: String = POSTS
        .iter()
        .map(|post| {
            let href = urls
                .generate("post", &slug_params(post.slug))
                .unwrap_or_default();
            format!("<li><a href=\"{href}\">{}</a></li>\n", post.title)
        })
        .collect();

    layout(&urls, "Posts", &format!("<ul>\n{items}</ul>"))
}

async fn post(
    Extension(urls): Extension<SharedUrlGenerator>,
    Path(slug): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let post = POSTS
        .iter()
        .find(|post| post.slug == slug)
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(layout(&urls, post.title, &format!("<p>{}</p>", post.body)))
}
