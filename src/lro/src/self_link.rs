// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Helpers for Compute Engine self links.
//!
//! Compute Engine identifies resources by URL, for example
//! `https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-f`.
//! Requests take the short name instead.

/// Returns the last path segment of `link`.
///
/// Returns `None` when that segment is empty, e.g. for an empty string or a
/// link ending in `/`. A value without any `/` is returned unchanged.
///
/// # Example
/// ```
/// # use compute_ops_lro::self_link::name_from_self_link;
/// let zone = name_from_self_link(
///     "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-f");
/// assert_eq!(zone, Some("us-central1-f"));
/// assert_eq!(name_from_self_link("us-central1-f"), Some("us-central1-f"));
/// ```
pub fn name_from_self_link(link: &str) -> Option<&str> {
    match link.rsplit('/').next() {
        Some("") | None => None,
        Some(name) => Some(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-f", Some("us-central1-f"))]
    #[test_case("projects/p/zones/europe-west1-b/disks/disk-1", Some("disk-1"))]
    #[test_case("us-central1-f", Some("us-central1-f"))]
    #[test_case("projects/p/zones/", None)]
    #[test_case("", None)]
    fn last_segment(input: &str, want: Option<&str>) {
        assert_eq!(name_from_self_link(input), want);
    }
}
