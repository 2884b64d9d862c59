//! HTML templates.
//!
//! Pure functions from the page model to [maud](https://maud.lambda.xyz/)
//! markup. Nothing here touches the filesystem or the clock: walk results,
//! snippets and the [`BuildStamp`] are passed in.
//!
//! ## Page Layout
//!
//! ```text
//! <head>            title, <base href=web_base>, style.css?v2, favicon
//! p.banner          optional notice
//! header            h1, "Last updated", nav.menu, div#subnav (coordinator pages)
//! img#legend
//! div#containers
//!   div.container > div.text      optional snippet (raw HTML)
//!   ...page body...               large images, sections, grids, embeds
//! div#lightbox      viewer markup driven by js/lightbox.js
//! ```
//!
//! All interpolated text is escaped; only snippets are inserted raw.

use crate::config::{Coordinator, Embeds, Page, SiteConfig, coordinator_file};
use crate::dates::BuildStamp;
use crate::scan::{Heading, Section};
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Output path of the lightbox script, relative to the site root.
pub const LIGHTBOX_JS_PATH: &str = "js/lightbox.js";

/// Everything the page chrome needs besides the body.
pub struct PageContext<'a> {
    pub config: &'a SiteConfig,
    pub stamp: &'a BuildStamp,
    pub page: &'a Page,
    /// Set on coordinator pages.
    pub coordinator: Option<&'a Coordinator>,
    pub snippet: Option<&'a str>,
}

/// Full HTML document around `body`.
pub fn render_page(ctx: &PageContext<'_>, body: Markup) -> Markup {
    let config = ctx.config;
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.title) }
                base href=(config.web_base);
                link rel="stylesheet" href="style.css?v2";
                link rel="icon" type="image/x-icon" href="favicon.ico";
            }
            body {
                @if let Some(banner) = &config.banner {
                    p.banner {
                        (banner.text) " "
                        a href=(banner.url) { (banner.url) }
                    }
                }
                header {
                    h1 { (config.title) }
                    p.update { "Last updated: " (ctx.stamp.updated) }
                    (top_menu(config, &ctx.page.key))
                    @if !ctx.page.coordinators().is_empty() {
                        (subnav(ctx.page, ctx.coordinator.map(|c| c.dir.as_str())))
                    }
                }
                img #legend src="legend.png" alt="legend";
                div #containers {
                    @if let Some(snippet) = ctx.snippet {
                        div.container {
                            div.text { (PreEscaped(snippet)) }
                        }
                    }
                    (body)
                }
                (lightbox())
            }
        }
    }
}

/// Top menu over every page not marked hidden.
pub fn top_menu(config: &SiteConfig, current_key: &str) -> Markup {
    html! {
        nav.menu {
            ul {
                @for page in config.pages.iter().filter(|p| !p.hidden) {
                    li {
                        a href=(page.link()) class=[link_class(page.key == current_key, page.active)] {
                            (page.name)
                        }
                    }
                }
            }
        }
    }
}

/// Coordinator selector of a coordinators page.
pub fn subnav(page: &Page, current_dir: Option<&str>) -> Markup {
    html! {
        div #subnav {
            ul {
                @for coordinator in page.coordinators() {
                    li {
                        a href=(coordinator_file(&page.key, &coordinator.dir))
                            class=[link_class(current_dir == Some(coordinator.dir.as_str()), coordinator.active)] {
                            (coordinator.name)
                        }
                    }
                }
            }
        }
    }
}

fn link_class(current: bool, active: bool) -> Option<&'static str> {
    match (current, active) {
        (true, true) => Some("current active"),
        (true, false) => Some("current"),
        (false, true) => Some("active"),
        (false, false) => None,
    }
}

fn versioned(prefix: &str, path: &str, stamp: &BuildStamp) -> String {
    format!("{}{}?v{}", prefix, path, stamp.version)
}

/// Thumbnail that opens the full-size chart in the lightbox.
pub fn image_block(config: &SiteConfig, stamp: &BuildStamp, path: &str) -> Markup {
    html! {
        div.grid-item {
            img src=(versioned(&config.thumbnail_url, path, stamp))
                data-full=(versioned(&config.image_url, path, stamp))
                alt=(path)
                loading="lazy";
        }
    }
}

/// One `div.container` grid of image blocks.
pub fn image_grid(config: &SiteConfig, stamp: &BuildStamp, paths: &[String]) -> Markup {
    html! {
        div.container {
            @for path in paths {
                (image_block(config, stamp, path))
            }
        }
    }
}

/// Full-width charts shown above the walked sections.
///
/// The visible image is the full-size one; the lightbox opens the thumbnail
/// URL.
pub fn large_images(config: &SiteConfig, stamp: &BuildStamp, paths: &[String]) -> Markup {
    html! {
        @for path in paths {
            div.container {
                div.large {
                    img src=(versioned(&config.image_url, path, stamp))
                        data-full=(versioned(&config.thumbnail_url, path, stamp))
                        alt=(path)
                        loading="lazy";
                }
            }
        }
    }
}

/// Headings and grids of a directory walk, in walk order.
pub fn sections(config: &SiteConfig, stamp: &BuildStamp, sections: &[Section]) -> Markup {
    html! {
        @for section in sections {
            @if let Some(h) = &section.heading {
                (heading(h))
            }
            @if let Some(images) = &section.images {
                (image_grid(config, stamp, images))
            }
        }
    }
}

fn heading(h: &Heading) -> Markup {
    html! {
        @match h.level {
            0 | 1 => h1 { (h.text) },
            2 => h2 { (h.text) },
            3 => h3 { (h.text) },
            4 => h4 { (h.text) },
            5 => h5 { (h.text) },
            _ => h6 { (h.text) },
        }
    }
}

pub fn embeds(embeds: &Embeds) -> Markup {
    html! {
        h2 { (embeds.title) }
        @for source in &embeds.sources {
            iframe src=(source) { "Your browser does not support iframes." }
        }
    }
}

fn lightbox() -> Markup {
    html! {
        div #lightbox {
            span.close { (PreEscaped("&times;")) }
            span.arrow.left { (PreEscaped("&#10094;")) }
            img #lightbox-img src="" alt="";
            span.arrow.right { (PreEscaped("&#10095;")) }
        }
        script src={ "./" (LIGHTBOX_JS_PATH) "?v1" } {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use chrono::NaiveDate;

    fn config() -> SiteConfig {
        parse_config(
            r#"{
                "data_source": "data/",
                "image_url": "https://img/",
                "thumbnail_url": "https://thumb/",
                "web_base": "https://site/stats/",
                "whitelist": [".png"],
                "banner": {"text": "Nightly build.", "url": "https://stable/"},
                "pages": {
                    "index": {"name": "Overview", "paths": ["a.png"]},
                    "wasabi2": {"name": "Wasabi 2", "active": true, "coordinators": [
                        {"name": "Kruw", "dir": "kruw", "active": true},
                        {"name": "Ginger", "dir": "ginger"}
                    ]},
                    "joinmarket": {"name": "JoinMarket", "dir": "jm", "hidden": true}
                }
            }"#,
        )
        .unwrap()
    }

    fn stamp() -> BuildStamp {
        BuildStamp::new(NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(), Some("14-06-2024".into()))
    }

    fn render(config: &SiteConfig, key: &str, coordinator: Option<&str>, snippet: Option<&str>) -> String {
        let stamp = stamp();
        let page = config.page(key).unwrap();
        let coordinator = coordinator.and_then(|dir| page.coordinators().iter().find(|c| c.dir == dir));
        let ctx = PageContext { config, stamp: &stamp, page, coordinator, snippet };
        render_page(&ctx, html! { p { "BODY" } }).into_string()
    }

    // =========================================================================
    // Page chrome
    // =========================================================================

    #[test]
    fn document_head() {
        let html = render(&config(), "index", None, None);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>CoinJoin Statistics</title>"));
        assert!(html.contains(r#"<base href="https://site/stats/">"#));
        assert!(html.contains(r#"href="style.css?v2""#));
        assert!(html.contains(r#"href="favicon.ico""#));
    }

    #[test]
    fn header_shows_update_date_and_banner() {
        let html = render(&config(), "index", None, None);

        assert!(html.contains("Last updated: 14-06-2024"));
        assert!(html.contains(r#"<p class="banner">Nightly build. <a href="https://stable/">"#));
    }

    #[test]
    fn no_banner_when_unset() {
        let mut config = config();
        config.banner = None;
        let html = render(&config, "index", None, None);
        assert!(!html.contains("banner"));
    }

    #[test]
    fn body_inside_containers_before_lightbox() {
        let html = render(&config(), "index", None, None);

        let containers = html.find(r#"<div id="containers">"#).unwrap();
        let body = html.find("BODY").unwrap();
        let lightbox = html.find(r#"<div id="lightbox">"#).unwrap();
        assert!(containers < body && body < lightbox);
        assert!(html.contains(r#"<script src="./js/lightbox.js?v1"></script>"#));
    }

    #[test]
    fn snippet_inserted_raw() {
        let html = render(&config(), "index", None, Some("<p>About <b>this</b></p>"));
        assert!(html.contains(
            r#"<div class="container"><div class="text"><p>About <b>this</b></p></div></div>"#
        ));
    }

    #[test]
    fn no_snippet_container_without_snippet() {
        let html = render(&config(), "index", None, None);
        assert!(!html.contains(r#"class="text""#));
    }

    // =========================================================================
    // Menus
    // =========================================================================

    #[test]
    fn menu_skips_hidden_pages_and_links_first_coordinator() {
        let html = top_menu(&config(), "index").into_string();

        assert!(html.contains(r#"href="index.html""#));
        assert!(html.contains(r#"href="wasabi2/kruw.html""#));
        assert!(!html.contains("JoinMarket"));
    }

    #[test]
    fn menu_marks_current_and_active() {
        let html = top_menu(&config(), "wasabi2").into_string();

        assert!(html.contains(r#"<a href="index.html">Overview</a>"#));
        assert!(html.contains(r#"<a href="wasabi2/kruw.html" class="current active">Wasabi 2</a>"#));
    }

    #[test]
    fn subnav_only_on_coordinator_pages() {
        let config = config();
        assert!(!render(&config, "index", None, None).contains("subnav"));

        let html = render(&config, "wasabi2", Some("ginger"), None);
        assert!(html.contains(r#"<div id="subnav">"#));
        assert!(html.contains(r#"<a href="wasabi2/kruw.html" class="active">Kruw</a>"#));
        assert!(html.contains(r#"<a href="wasabi2/ginger.html" class="current">Ginger</a>"#));
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    #[test]
    fn image_block_urls_carry_version() {
        let html = image_block(&config(), &stamp(), "ww2/2024-06-01 10-00-00/a.png").into_string();

        assert!(html.contains(r#"src="https://thumb/ww2/2024-06-01 10-00-00/a.png?v2024-06-20""#));
        assert!(html.contains(r#"data-full="https://img/ww2/2024-06-01 10-00-00/a.png?v2024-06-20""#));
        assert!(html.contains(r#"alt="ww2/2024-06-01 10-00-00/a.png""#));
        assert!(html.contains(r#"loading="lazy""#));
    }

    #[test]
    fn large_images_swap_full_and_thumbnail() {
        let html = large_images(&config(), &stamp(), &["top.png".to_string()]).into_string();

        assert!(html.starts_with(r#"<div class="container"><div class="large"><img src="https://img/top.png?v2024-06-20" data-full="https://thumb/top.png?v2024-06-20""#));
    }

    #[test]
    fn sections_render_headings_and_grids_in_order() {
        let walked = vec![
            Section { heading: None, images: Some(vec!["top.png".into()]) },
            Section {
                heading: Some(Heading { level: 2, text: "P - June 2024".into() }),
                images: Some(vec![]),
            },
            Section {
                heading: Some(Heading { level: 3, text: "deep".into() }),
                images: None,
            },
        ];
        let html = sections(&config(), &stamp(), &walked).into_string();

        let grid = html.find("top.png").unwrap();
        let june = html.find("<h2>P - June 2024</h2>").unwrap();
        let deep = html.find("<h3>deep</h3>").unwrap();
        assert!(grid < june && june < deep);
        assert_eq!(html.matches(r#"<div class="container">"#).count(), 2);
    }

    #[test]
    fn deep_headings_cap_at_h6() {
        let h = Heading { level: 9, text: "x".into() };
        assert_eq!(heading(&h).into_string(), "<h6>x</h6>");
    }

    #[test]
    fn embeds_render_iframes() {
        let html = embeds(&Embeds {
            title: "Flows".into(),
            sources: vec!["./flows/a.html".into(), "./flows/b.html".into()],
        })
        .into_string();

        assert!(html.starts_with("<h2>Flows</h2>"));
        assert_eq!(html.matches("<iframe").count(), 2);
        assert!(html.contains(r#"<iframe src="./flows/a.html">Your browser does not support iframes.</iframe>"#));
    }

    #[test]
    fn text_is_escaped() {
        let mut config = config();
        config.pages[0].name = "<script>alert('x')</script>".into();
        let html = top_menu(&config, "").into_string();

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
