//! Card content pipeline
//!
//! Turns the feed's markdown source into `{title, body}` records with
//! pre-rendered markup:
//! - an optional `%%%` configuration block naming icon SVG paths
//! - `# ` headings start cards, every other non-empty line is a body block
//! - `<\n>`, `**bold**` and `[label](url)` inline syntax
//!
//! Input is trusted page content; nothing here escapes HTML.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::future::Future;
use std::sync::LazyLock;

use futures::future::join_all;
use regex::{Captures, Regex};

/// Icon name -> SVG markup (or, before fetching, icon name -> path)
pub type IconMap = BTreeMap<String, String>;

/// Marker line that starts icon definitions inside the block
const DEFINE_MARKER: &str = "define:";
/// Class carried by icon links; its presence turns a block into a link row
const SOCIAL_LINK_CLASS: &str = "social-link";

/// `%%%` fence lines around the configuration block
static CONFIG_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^%%%\n([\s\S]*?)\n%%%$").expect("config block pattern"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern"));

/// One card's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardData {
    /// Title markup
    pub title: String,
    /// Body markup
    pub body: String,
}

/// Result of stripping the configuration block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentConfig {
    pub remaining_markdown: String,
    /// Icon name -> SVG path
    pub icon_definitions: IconMap,
}

/// Extract the `%%%`-fenced configuration block, if any
///
/// ```text
/// %%%
/// define:
///   github: /icons/github.svg
/// %%%
/// ```
pub fn parse_configuration(text: &str) -> ContentConfig {
    let Some(block) = CONFIG_BLOCK.captures(text) else {
        return ContentConfig {
            remaining_markdown: text.to_string(),
            icon_definitions: IconMap::new(),
        };
    };

    let mut icon_definitions = IconMap::new();
    let mut in_define = false;
    for line in block[1].lines() {
        let trimmed = line.trim();
        if trimmed == DEFINE_MARKER {
            in_define = true;
            continue;
        }
        if in_define && !trimmed.is_empty() {
            if let Some((key, value)) = trimmed.split_once(':') {
                let key = key.trim();
                if !key.is_empty() {
                    icon_definitions.insert(key.to_string(), value.trim().to_string());
                }
            }
        }
    }

    ContentConfig {
        remaining_markdown: CONFIG_BLOCK.replace(text, "").trim().to_string(),
        icon_definitions,
    }
}

/// Fetch every icon in `definitions` concurrently with `fetch(path)`
///
/// A failed icon is logged and left out; its links render as plain text.
pub async fn load_icons<F, Fut, E>(definitions: &IconMap, fetch: F) -> IconMap
where
    F: Fn(&str) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: Debug,
{
    let fetches = definitions.iter().map(|(name, path)| {
        let request = fetch(path);
        async move {
            match request.await {
                Ok(svg) => Some((name.clone(), svg)),
                Err(e) => {
                    log::warn!("Failed to load icon {} at {}: {:?}", name, path, e);
                    None
                }
            }
        }
    });
    join_all(fetches).await.into_iter().flatten().collect()
}

/// Split markdown into cards on `# ` headings
pub fn parse_markdown(markdown: &str, icons: &IconMap) -> Vec<CardData> {
    split_sections(markdown)
        .into_iter()
        .filter(|section| !section.trim().is_empty())
        .map(|section| parse_section(&section, icons))
        .collect()
}

fn split_sections(markdown: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    for (i, line) in markdown.split('\n').enumerate() {
        if let Some(heading) = line.strip_prefix("# ") {
            sections.push(std::mem::take(&mut current));
            current.push_str(heading);
        } else {
            if i > 0 {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    sections.push(current);
    sections
}

fn parse_section(section: &str, icons: &IconMap) -> CardData {
    let mut lines = section.split('\n');
    let title = expand_line_breaks(lines.next().unwrap_or_default().trim());

    let body = lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let content = expand_links(&expand_bold(&expand_line_breaks(line)), icons);
            if content.contains(&format!("class=\"{SOCIAL_LINK_CLASS}\"")) {
                format!("<div class=\"divider-sm\"></div><div class=\"links\">{content}</div>")
            } else {
                format!("<p>{content}</p>")
            }
        })
        .collect::<String>();

    CardData { title, body }
}

/// `<\n>` -> `<br>`
fn expand_line_breaks(text: &str) -> String {
    text.replace("<\\n>", "<br>")
}

/// `**x**` -> `<strong>x</strong>`; an unmatched `**` is left alone
fn expand_bold(text: &str) -> String {
    BOLD.replace_all(text, "<strong>${1}</strong>").into_owned()
}

/// `[label](url)` -> anchor; labels naming a loaded icon become icon links
fn expand_links(text: &str, icons: &IconMap) -> String {
    LINK.replace_all(text, |caps: &Captures| render_link(&caps[1], &caps[2], icons))
        .into_owned()
}

fn render_link(label: &str, url: &str, icons: &IconMap) -> String {
    match icons.get(label) {
        Some(svg) => format!(
            "<a href=\"{url}\" target=\"_blank\" aria-label=\"{label}\" class=\"{SOCIAL_LINK_CLASS}\">{svg}</a>"
        ),
        None => format!("<a href=\"{url}\" target=\"_blank\">{label}</a>"),
    }
}

/// Markup for the whole card list, one `.card-wrapper` per card
pub fn render_cards_markup(cards: &[CardData]) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            format!(
                r#"
    <div class="card-wrapper" data-index="{index}">
      <article class="glass-card">
        <div class="content">
          <header>
            <h1>{title}</h1>
            <div class="divider"></div>
          </header>
          <section class="bio">
            {body}
          </section>
        </div>
      </article>
    </div>
  "#,
                title = card.title,
                body = card.body
            )
        })
        .collect()
}
