use crate::domain::model::User;
use crate::i18n::Language;
use crate::pages::Route;
use maud::{html, Markup, PreEscaped, DOCTYPE};

const MAIN_CSS: &str = include_str!("main.css");

/// Everything the shared layout needs besides the page body.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub lang: Language,
    pub user: Option<&'a User>,
    pub error: Option<&'a str>,
}

impl<'a> PageContext<'a> {
    pub fn new(lang: Language, user: Option<&'a User>) -> Self {
        Self {
            lang,
            user,
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

pub fn page(ctx: &PageContext, title: &str, head: Option<Markup>, content: Markup) -> Markup {
    let lang = ctx.lang;
    html! {
        (DOCTYPE)
        html lang=(lang.code()) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1, shrink-to-fit=no";
                title { (title) " | " (lang.t("app.title")) }
                style { (PreEscaped(MAIN_CSS)) }
                @if let Some(h) = head {
                    (h)
                }
            }
            body {
                (header(ctx))
                @if let Some(error) = ctx.error {
                    div class="flash error" { (error) }
                }
                main { (content) }
            }
        }
    }
}

fn header(ctx: &PageContext) -> Markup {
    let lang = ctx.lang;
    html! {
        header {
            a class="title" href=(Route::Home.path()) { (lang.t("app.title")) }
            (language_selector(lang))
            @if let Some(user) = ctx.user {
                span class="email" { (user.email) }
                form class="logout" action="/signout" method="POST" {
                    input type="submit" value=(lang.t("auth.signOut"));
                }
            } @else {
                a class="btn" href=(Route::SignIn.path()) { (lang.t("auth.signIn")) }
            }
        }
        nav {
            a href=(Route::Home.path()) { (lang.t("nav.home")) }
            a href=(Route::Venues.path()) { (lang.t("nav.venues")) }
            @if ctx.user.is_some() {
                a href=(Route::Checklist.path()) { (lang.t("nav.checklist")) }
                a href=(Route::Budget.path()) { (lang.t("nav.budget")) }
            }
        }
    }
}

fn language_selector(current: Language) -> Markup {
    html! {
        form class="language" method="GET" {
            label for="lang" { (current.t("header.languageSelector")) }
            select id="lang" name="lang" onchange="this.form.submit()" {
                @for lang in Language::ALL {
                    option value=(lang.code()) selected[lang == current] { (lang.native_name()) }
                }
            }
        }
    }
}
