// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you the story
//! of how the system operates: how deep it recurses, how much it fetches,
//! how long responses may be cached.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips during recursive fetching.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Default nesting depth when recursively fetching block children.
///
/// Blog posts rarely nest more than a few levels of toggles and lists.
pub const DEFAULT_FETCH_DEPTH: usize = 5;

/// Maximum nesting depth when recursively fetching from the Notion API.
///
/// Notion pages can nest arbitrarily deep (toggles within columns within
/// synced blocks). This limit prevents stack overflow and runaway fetches.
/// 50 levels is far deeper than any real Notion workspace.
pub const NOTION_MAX_FETCH_DEPTH: usize = 50;

/// Hostname of the S3 bucket Notion serves uploaded files from.
///
/// URLs on this host carry AWS signatures that expire roughly an hour
/// after issue; they must never be embedded directly in rendered HTML.
pub const NOTION_SIGNED_ASSET_HOST: &str = "prod-files-secure.s3.us-west-2.amazonaws.com";

// ---------------------------------------------------------------------------
// Image proxy boundaries
// ---------------------------------------------------------------------------

/// Cache policy for proxied image responses.
///
/// Fresh for one hour (matching the upstream signature lifetime), then
/// served stale for a day while revalidating in the background.
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=3600, stale-while-revalidate=86400";

/// Content type assumed when the upstream response doesn't declare one.
///
/// Notion-hosted assets reaching the proxy are overwhelmingly photos.
pub const IMAGE_FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

/// How many times the client-side retry loop re-requests a failed image.
pub const IMAGE_RETRY_MAX: u32 = 3;

/// Delay between client-side image retry attempts, in milliseconds.
pub const IMAGE_RETRY_DELAY_MS: u64 = 1000;

// ---------------------------------------------------------------------------
// String capacity hints (performance, not correctness)
// ---------------------------------------------------------------------------

/// Estimated characters per block, used to pre-allocate output strings.
///
/// This is a performance hint, not a constraint. Over-estimating wastes
/// a little memory; under-estimating causes reallocation.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;
