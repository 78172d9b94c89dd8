use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_KEY: &str = "landing";

/// The decoded navigation position: a page key plus optional auxiliary
/// parameters. The URL query string is the durable representation of this
/// value; it is replaced wholesale on every navigation and never partially
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub page: String,
    /// `None` whenever the triggering navigation carried no auxiliary
    /// parameters. Callers must check for `None`, not emptiness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_KEY.to_string(),
            data: None,
        }
    }
}

impl NavigationState {
    pub fn page_only(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            data: None,
        }
    }

    pub fn with_data<I, K, V>(page: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let data: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            page: page.into(),
            data: if data.is_empty() { None } else { Some(data) },
        }
    }

    pub fn data_value(&self, key: &str) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.get(key))
            .map(String::as_str)
    }

    /// Decodes a `location.search` string. The leading `?` is optional.
    /// Missing or malformed input degrades to the default state; there are
    /// no error conditions.
    pub fn decode(search: &str) -> Self {
        let trimmed = search.trim().trim_start_matches('?');
        let mut page: Option<String> = None;
        let mut data: BTreeMap<String, String> = BTreeMap::new();

        for pair in trimmed.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (raw_key, raw_value) = match pair.split_once('=') {
                Some((key, value)) => (key, value),
                None => (pair, ""),
            };
            let key = percent_decode(raw_key);
            let value = percent_decode(raw_value);
            if key.is_empty() {
                continue;
            }
            if key == "page" {
                if !value.is_empty() {
                    page = Some(value);
                }
            } else {
                data.insert(key, value);
            }
        }

        Self {
            page: page.unwrap_or_else(|| DEFAULT_PAGE_KEY.to_string()),
            data: if data.is_empty() { None } else { Some(data) },
        }
    }

    /// Encodes the state as a fresh query string. Prior URL parameters are
    /// never preserved; empty-string values are dropped.
    pub fn to_query(&self) -> String {
        let mut query = format!("?page={}", percent_encode(&self.page));
        if let Some(data) = self.data.as_ref() {
            for (key, value) in data {
                if value.is_empty() {
                    continue;
                }
                query.push('&');
                query.push_str(&percent_encode(key));
                query.push('=');
                query.push_str(&percent_encode(value));
            }
        }
        query
    }
}

fn percent_encode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            b' ' => encoded.push_str("%20"),
            _ => {
                encoded.push('%');
                encoded.push(hex_digit(byte >> 4));
                encoded.push(hex_digit(byte & 0x0F));
            }
        }
    }
    encoded
}

fn hex_digit(nibble: u8) -> char {
    char::from_digit(u32::from(nibble), 16)
        .map(|digit| digit.to_ascii_uppercase())
        .unwrap_or('0')
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'%' if index + 2 < bytes.len() => {
                let high = hex_value(bytes[index + 1]);
                let low = hex_value(bytes[index + 2]);
                if let (Some(high), Some(low)) = (high, low) {
                    decoded.push((high << 4) | low);
                    index += 3;
                } else {
                    decoded.push(b'%');
                    index += 1;
                }
            }
            b'+' => {
                decoded.push(b' ');
                index += 1;
            }
            byte => {
                decoded.push(byte);
                index += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen, quickcheck};

    #[test]
    fn decode_without_page_defaults_to_landing() {
        let state = NavigationState::decode("");
        assert_eq!(state.page, "landing");
        assert_eq!(state.data, None);
    }

    #[test]
    fn decode_page_only_yields_none_data_not_empty_map() {
        let state = NavigationState::decode("?page=marketplace");
        assert_eq!(state.page, "marketplace");
        assert_eq!(state.data, None);
    }

    #[test]
    fn decode_collects_auxiliary_parameters() {
        let state = NavigationState::decode("?page=project-detail&projectId=p-42&tab=budget");
        assert_eq!(state.page, "project-detail");
        assert_eq!(state.data_value("projectId"), Some("p-42"));
        assert_eq!(state.data_value("tab"), Some("budget"));
    }

    #[test]
    fn decode_tolerates_missing_leading_question_mark() {
        let state = NavigationState::decode("page=chat&targetUserId=u-1");
        assert_eq!(state.page, "chat");
        assert_eq!(state.data_value("targetUserId"), Some("u-1"));
    }

    #[test]
    fn decode_ignores_empty_page_value() {
        let state = NavigationState::decode("?page=&foo=bar");
        assert_eq!(state.page, "landing");
        assert_eq!(state.data_value("foo"), Some("bar"));
    }

    #[test]
    fn decode_handles_percent_and_plus_escapes() {
        let state = NavigationState::decode("?page=chat&targetUserName=Lena%20Novak&note=a+b");
        assert_eq!(state.data_value("targetUserName"), Some("Lena Novak"));
        assert_eq!(state.data_value("note"), Some("a b"));
    }

    #[test]
    fn decode_degrades_on_malformed_escapes() {
        let state = NavigationState::decode("?page=chat&x=%zz&y=%2");
        assert_eq!(state.page, "chat");
        assert_eq!(state.data_value("x"), Some("%zz"));
        assert_eq!(state.data_value("y"), Some("%2"));
    }

    #[test]
    fn to_query_drops_empty_values() {
        let state = NavigationState::with_data(
            "talent-profile",
            [("talentId", "t-9"), ("referrer", "")],
        );
        assert_eq!(state.to_query(), "?page=talent-profile&talentId=t-9");
    }

    #[test]
    fn to_query_escapes_reserved_characters() {
        let state = NavigationState::with_data("chat", [("targetUserName", "Ana & Co=1")]);
        assert_eq!(
            state.to_query(),
            "?page=chat&targetUserName=Ana%20%26%20Co%3D1"
        );
    }

    #[test]
    fn round_trips_typed_navigation() {
        let state = NavigationState::with_data(
            "collaboration-detail",
            [("collaborationId", "c-77"), ("origin", "leads")],
        );
        assert_eq!(NavigationState::decode(&state.to_query()), state);
    }

    #[derive(Debug, Clone)]
    struct QueryText(String);

    impl Arbitrary for QueryText {
        fn arbitrary(g: &mut Gen) -> Self {
            let length = usize::arbitrary(g) % 12 + 1;
            let text: String = (0..length)
                .map(|_| {
                    let choices = [
                        'a', 'b', 'z', 'A', '0', '9', '-', '_', '.', ' ', '&', '=', '%', '?',
                        '/', 'é',
                    ];
                    *g.choose(&choices).unwrap_or(&'a')
                })
                .collect();
            QueryText(text)
        }
    }

    quickcheck! {
        fn query_round_trip_preserves_page_and_data(
            page: QueryText,
            entries: Vec<(QueryText, QueryText)>
        ) -> bool {
            let state = NavigationState::with_data(
                page.0,
                entries
                    .into_iter()
                    .map(|(key, value)| (key.0, value.0))
                    .filter(|(key, value)| !key.is_empty() && !value.is_empty() && key != "page"),
            );
            NavigationState::decode(&state.to_query()) == state
        }
    }
}
