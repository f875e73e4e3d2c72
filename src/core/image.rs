//! Stateless image URL rewriting.
//!
//! Storage URLs get sizing hints appended so a CDN or proxy in front of the
//! object store can serve a smaller rendition; anything else passes through.

/// Path marker identifying a public object-storage URL.
const STORAGE_PUBLIC_MARKER: &str = "supabase.co/storage/v1/object/public/";

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_QUALITY: u32 = 75;

/// Append `width`, `q` and `format=webp` to storage URLs; other URLs are
/// returned unchanged. Empty input yields empty output.
pub fn optimized_image_url(url: &str, width: u32, quality: u32) -> String {
    if url.is_empty() {
        return String::new();
    }
    if url.contains(STORAGE_PUBLIC_MARKER) {
        let separator = if url.contains('?') { '&' } else { '?' };
        return format!("{url}{separator}width={width}&q={quality}&format=webp");
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_passes_through_empty() {
        assert_eq!(optimized_image_url("", 400, 75), "");
    }

    #[test]
    fn storage_urls_get_sizing_params() {
        let url = "https://x.supabase.co/storage/v1/object/public/cars/onix.jpg";
        assert_eq!(
            optimized_image_url(url, 500, 75),
            format!("{url}?width=500&q=75&format=webp")
        );
    }

    #[test]
    fn existing_query_uses_ampersand() {
        let url = "https://x.supabase.co/storage/v1/object/public/cars/onix.jpg?t=1";
        assert!(optimized_image_url(url, 400, 75).contains("?t=1&width=400"));
    }

    #[test]
    fn foreign_urls_pass_through() {
        let url = "https://cdn.example.com/onix.jpg";
        assert_eq!(optimized_image_url(url, 400, 75), url);
    }
}
