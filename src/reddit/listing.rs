// src/reddit/listing.rs
//! Wire types for `/user/{name}/about` and listing endpoints.

use crate::harvest::types::{Item, ItemClass, UserHandle};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct About {
    pub data: AboutData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AboutData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub is_suspended: bool,
}

impl AboutData {
    pub fn into_handle(self, fallback_name: &str) -> UserHandle {
        UserHandle {
            name: if self.name.is_empty() {
                fallback_name.to_string()
            } else {
                self.name
            },
            id: self.id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thing {
    #[serde(default)]
    pub kind: String,
    pub data: ThingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThingData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub selftext: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// One decoded listing page.
#[derive(Debug, Default)]
pub struct ListingPage {
    pub items: Vec<Item>,
    /// Cursor for the next page; `None` on the last one.
    pub after: Option<String>,
}

fn decode(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}

/// Listing kind expected for a class (`t3` posts, `t1` comments).
fn kind_for(class: ItemClass) -> &'static str {
    match class {
        ItemClass::Post => "t3",
        ItemClass::Comment => "t1",
    }
}

impl Listing {
    pub fn into_page(self, class: ItemClass) -> ListingPage {
        let want = kind_for(class);
        let items = self
            .data
            .children
            .into_iter()
            .filter(|t| t.kind.is_empty() || t.kind == want)
            .map(|t| {
                let d = t.data;
                let (title, body) = match class {
                    ItemClass::Post => (
                        Some(decode(d.title.as_deref().unwrap_or_default())),
                        decode(d.selftext.as_deref().unwrap_or_default()),
                    ),
                    ItemClass::Comment => (None, decode(d.body.as_deref().unwrap_or_default())),
                };
                Item {
                    class,
                    id: d.name,
                    category_label: d.subreddit,
                    created_utc: d.created_utc.trunc() as i64,
                    title,
                    body,
                }
            })
            .collect();
        ListingPage {
            items,
            after: self.data.after.filter(|a| !a.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTS: &str = r#"{
      "kind": "Listing",
      "data": {
        "after": "t3_b",
        "children": [
          {"kind": "t3", "data": {"name": "t3_a", "created_utc": 1700000100.7,
            "subreddit": "hungary", "title": "Kérdés &amp; válasz", "selftext": ""}},
          {"kind": "t3", "data": {"name": "t3_b", "created_utc": 1700000000.0,
            "subreddit": "Budapest", "title": "Hello", "selftext": "line1\nline2"}}
        ]
      }
    }"#;

    #[test]
    fn post_page_decodes_and_truncates_timestamps() {
        let l: Listing = serde_json::from_str(POSTS).unwrap();
        let page = l.into_page(ItemClass::Post);
        assert_eq!(page.after.as_deref(), Some("t3_b"));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].created_utc, 1_700_000_100);
        assert_eq!(page.items[0].title.as_deref(), Some("Kérdés & válasz"));
        assert_eq!(page.items[1].category_label, "Budapest");
        assert_eq!(page.items[1].body, "line1\nline2");
    }

    #[test]
    fn comment_page_without_cursor_is_last() {
        let json = r#"{"kind":"Listing","data":{"after":null,"children":[
            {"kind":"t1","data":{"name":"t1_x","created_utc":5,"subreddit":"a","body":"&lt;3"}}]}}"#;
        let l: Listing = serde_json::from_str(json).unwrap();
        let page = l.into_page(ItemClass::Comment);
        assert!(page.after.is_none());
        assert_eq!(page.items[0].body, "<3");
        assert_eq!(page.items[0].title, None);
    }

    #[test]
    fn about_falls_back_to_requested_name() {
        let a: About = serde_json::from_str(r#"{"kind":"t2","data":{"is_suspended":true}}"#).unwrap();
        assert!(a.data.is_suspended);
        assert_eq!(a.data.into_handle("ghost").name, "ghost");
    }
}
