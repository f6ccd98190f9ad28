//! HTML pages, rendered with maud.

mod layout;
mod venues;

pub use layout::{page, PageContext};
pub use venues::{plain_table, venues_page, VenuesView};

use maud::{html, Markup};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Venues,
    Checklist,
    Budget,
    SignIn,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Venues,
        Route::Checklist,
        Route::Budget,
        Route::SignIn,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Venues => "/venues",
            Route::Checklist => "/checklist",
            Route::Budget => "/budget",
            Route::SignIn => "/signin",
        }
    }

    pub fn requires_user(&self) -> bool {
        matches!(self, Route::Venues)
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim().split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p if p.starts_with('/') => p,
            p => return Route::from_str(&format!("/{}", p)),
        };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == path)
            .ok_or_else(|| format!("no page at '{}'", s))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Renders `route`. The venues page without a signed-in user shows the
/// sign-in form instead.
pub fn render(route: Route, ctx: &PageContext, venues: Option<&VenuesView>) -> Markup {
    match route {
        route if route.requires_user() && ctx.user.is_none() => {
            tracing::debug!("No user for {}, showing sign-in", route);
            signin_page(ctx)
        }
        Route::Venues => venues_page(ctx, venues.unwrap_or(&VenuesView::default())),
        Route::Home => home_page(ctx),
        Route::Checklist => section_page(ctx, "checklist"),
        Route::Budget => section_page(ctx, "budget"),
        Route::SignIn => signin_page(ctx),
    }
}

fn home_page(ctx: &PageContext) -> Markup {
    let lang = ctx.lang;
    page(
        ctx,
        lang.t("nav.home"),
        None,
        html! {
            div class="home" {
                h1 { (lang.t("home.title")) }
                p class="subtitle" { (lang.t("home.subtitle")) }
            }
        },
    )
}

fn section_page(ctx: &PageContext, section: &str) -> Markup {
    let lang = ctx.lang;
    let title = lang.t(match section {
        "checklist" => "checklist.title",
        _ => "budget.title",
    });
    page(
        ctx,
        title,
        None,
        html! {
            div class=(section) {
                h2 { (title) }
            }
        },
    )
}

fn signin_page(ctx: &PageContext) -> Markup {
    let lang = ctx.lang;
    page(
        ctx,
        lang.t("auth.signIn"),
        None,
        html! {
            div class="signin" {
                h2 { (lang.t("auth.signIn")) }
                form action=(Route::SignIn.path()) method="POST" {
                    label for="email" { (lang.t("auth.email")) }
                    input id="email" type="email" name="email" required;
                    label for="password" { (lang.t("auth.password")) }
                    input id="password" type="password" name="password" required;
                    input class="btn" type="submit" value=(lang.t("auth.signIn"));
                }
            }
        },
    )
}
