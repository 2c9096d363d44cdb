use super::types::{map_sdk_error, AwsStore};
use crate::error::StoreResult;
use crate::namespace::{list_children, Listing};

/// List every key under `prefix`, following continuation tokens.
///
/// Folder markers are kept; the namespace view needs them to show empty
/// folders.
pub async fn list_all_keys(store: &AwsStore, prefix: &str) -> StoreResult<Vec<String>> {
    let mut all_keys: Vec<String> = Vec::new();
    let mut continuation_token: Option<String> = None;
    let mut page_count = 0;

    loop {
        let mut request = store
            .client
            .list_objects_v2()
            .bucket(&store.bucket)
            .max_keys(1000);

        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }
        if let Some(token) = &continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_sdk_error(prefix, e))?;
        page_count += 1;

        all_keys.extend(
            response
                .contents()
                .iter()
                .filter_map(|obj| obj.key().map(|k| k.to_string())),
        );

        if !response.is_truncated().unwrap_or(false) {
            break;
        }

        continuation_token = response.next_continuation_token().map(|s| s.to_string());
        if continuation_token.is_none() {
            break;
        }
    }

    log::debug!(
        "listed {} keys under '{}' in {} page(s)",
        all_keys.len(),
        prefix,
        page_count
    );
    Ok(all_keys)
}

/// Immediate children of `prefix` through a `/`-delimited listing.
///
/// S3 folds everything below the next `/` into common prefixes, so only one
/// level is paged through no matter how deep the subtree is.
pub async fn list_folder_children(store: &AwsStore, prefix: &str) -> StoreResult<Listing> {
    let mut keys: Vec<String> = Vec::new();
    let mut common_prefixes: Vec<String> = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let mut request = store
            .client
            .list_objects_v2()
            .bucket(&store.bucket)
            .delimiter("/")
            .max_keys(1000);

        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }
        if let Some(token) = &continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_sdk_error(prefix, e))?;

        keys.extend(
            response
                .contents()
                .iter()
                .filter_map(|obj| obj.key().map(|k| k.to_string())),
        );
        common_prefixes.extend(
            response
                .common_prefixes()
                .iter()
                .filter_map(|p| p.prefix().map(|s| s.to_string())),
        );

        if !response.is_truncated().unwrap_or(false) {
            break;
        }
        continuation_token = response.next_continuation_token().map(|s| s.to_string());
        if continuation_token.is_none() {
            break;
        }
    }

    Ok(delimited_listing(prefix, &keys, &common_prefixes))
}

/// Fold one level of keys and common prefixes into a [`Listing`].
///
/// Both go through the same classification as a full listing, so markers and
/// empty segments are treated identically.
fn delimited_listing(prefix: &str, keys: &[String], common_prefixes: &[String]) -> Listing {
    list_children(prefix, keys.iter().chain(common_prefixes.iter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn delimited_page_matches_full_listing() {
        let keys = strings(&["a/", "a/b.txt"]);
        let common = strings(&["a/c/", "a//"]);
        let listing = delimited_listing("a/", &keys, &common);
        assert_eq!(listing.files, vec!["a/b.txt"]);
        assert_eq!(listing.folders, vec!["a/c/"]);

        let full = list_children("a/", ["a/", "a/b.txt", "a/c/d.txt", "a/c/e/f.txt"]);
        assert_eq!(listing, full);
    }

    #[test]
    fn root_page() {
        let listing = delimited_listing("", &strings(&["e.txt"]), &strings(&["a/", "photos/"]));
        assert_eq!(listing.files, vec!["e.txt"]);
        assert_eq!(listing.folders, vec!["a/", "photos/"]);
    }
}
