//! Request URL construction for the document and its proxies.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped when a URL is embedded as a query parameter.
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Placeholder a proxy template may use to position the encoded document URL.
pub const URL_PLACEHOLDER: &str = "{url}";

const SHEETS_HOST: &str = "docs.google.com";

/// Rewrites a spreadsheet share or edit link to its CSV export link.
///
/// `https://docs.google.com/spreadsheets/d/<id>/edit?usp=sharing#gid=7`
/// becomes `https://docs.google.com/spreadsheets/d/<id>/export?format=csv&gid=7`.
/// The sheet tab defaults to `gid=0`. Export links, published links, and
/// URLs on other hosts are returned unchanged.
#[must_use]
pub fn export_csv_url(document_url: &str) -> String {
    let Ok(url) = reqwest::Url::parse(document_url) else {
        return document_url.to_owned();
    };
    if url.host_str() != Some(SHEETS_HOST) {
        return document_url.to_owned();
    }

    let Some(segments) = url.path_segments().map(|s| s.collect::<Vec<_>>()) else {
        return document_url.to_owned();
    };
    let Some(d_pos) = segments.iter().position(|s| *s == "d") else {
        return document_url.to_owned();
    };
    let Some(doc_id) = segments.get(d_pos + 1).filter(|id| !id.is_empty() && **id != "e") else {
        return document_url.to_owned();
    };
    if segments.get(d_pos + 2) == Some(&"export") {
        return document_url.to_owned();
    }

    let gid = url
        .fragment()
        .and_then(|f| f.strip_prefix("gid="))
        .map(str::to_owned)
        .or_else(|| {
            url.query_pairs()
                .find(|(k, _)| k == "gid")
                .map(|(_, v)| v.into_owned())
        })
        .filter(|g| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or_else(|| "0".to_owned());

    let prefix = segments[..d_pos].join("/");
    format!(
        "{}://{SHEETS_HOST}/{prefix}/d/{doc_id}/export?format=csv&gid={gid}",
        url.scheme()
    )
}

/// Builds the request URL for a proxy template.
///
/// The document URL is percent-encoded and substituted for `{url}` when the
/// template contains it, otherwise appended to the template.
#[must_use]
pub fn proxy_request_url(template: &str, document_url: &str) -> String {
    let encoded = utf8_percent_encode(document_url, URL_COMPONENT).to_string();
    if template.contains(URL_PLACEHOLDER) {
        template.replace(URL_PLACEHOLDER, &encoded)
    } else {
        format!("{template}{encoded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "1b-5Azi9M7ySzPGj0vnyBWL5jdRpKMIhGyH5455B0S0g";

    #[test]
    fn share_link_becomes_export_link() {
        let url = format!("https://docs.google.com/spreadsheets/d/{ID}/edit?usp=sharing");
        assert_eq!(
            export_csv_url(&url),
            format!("https://docs.google.com/spreadsheets/d/{ID}/export?format=csv&gid=0")
        );
    }

    #[test]
    fn gid_fragment_is_kept() {
        let url = format!("https://docs.google.com/spreadsheets/d/{ID}/edit#gid=1234");
        assert_eq!(
            export_csv_url(&url),
            format!("https://docs.google.com/spreadsheets/d/{ID}/export?format=csv&gid=1234")
        );
    }

    #[test]
    fn gid_query_is_kept() {
        let url = format!("https://docs.google.com/spreadsheets/d/{ID}/edit?gid=55");
        assert!(export_csv_url(&url).ends_with("gid=55"));
    }

    #[test]
    fn bare_document_link_becomes_export_link() {
        let url = format!("https://docs.google.com/spreadsheets/d/{ID}");
        assert_eq!(
            export_csv_url(&url),
            format!("https://docs.google.com/spreadsheets/d/{ID}/export?format=csv&gid=0")
        );
    }

    #[test]
    fn export_link_is_unchanged() {
        let url = format!("https://docs.google.com/spreadsheets/d/{ID}/export?format=csv&gid=3");
        assert_eq!(export_csv_url(&url), url);
    }

    #[test]
    fn published_link_is_unchanged() {
        let url = "https://docs.google.com/spreadsheets/d/e/2PACX-abc/pub?output=csv";
        assert_eq!(export_csv_url(url), url);
    }

    #[test]
    fn other_hosts_are_unchanged() {
        let url = "http://127.0.0.1:8080/catalog.csv";
        assert_eq!(export_csv_url(url), url);
    }

    #[test]
    fn unparsable_url_is_unchanged() {
        assert_eq!(export_csv_url("not a url"), "not a url");
    }

    #[test]
    fn prefix_proxy_appends_encoded_url() {
        assert_eq!(
            proxy_request_url(
                "https://api.allorigins.win/raw?url=",
                "https://docs.google.com/x/export?format=csv&gid=0"
            ),
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fdocs.google.com%2Fx%2Fexport%3Fformat%3Dcsv%26gid%3D0"
        );
    }

    #[test]
    fn placeholder_proxy_substitutes_encoded_url() {
        assert_eq!(
            proxy_request_url("http://proxy.local/fetch?u={url}&raw=1", "https://a.example/b c"),
            "http://proxy.local/fetch?u=https%3A%2F%2Fa.example%2Fb%20c&raw=1"
        );
    }

    #[test]
    fn unreserved_characters_are_not_encoded() {
        assert_eq!(
            proxy_request_url("", "a-b_c.d!e~f*g'h(i)j"),
            "a-b_c.d!e~f*g'h(i)j"
        );
    }
}
