//! Word-based string generation.
//!
//! Strings are built from an embedded English word list. Category columns
//! pick from a small pool drawn once per column; long-text columns join
//! several random words.

use rand::Rng;

/// Number of distinct entries drawn into a column's category pool.
pub const CATEGORY_POOL_SIZE: usize = 10;

const WORDS: &[&str] = &[
    "abandon", "ability", "absence", "academy", "account", "acid", "acorn", "action",
    "adapter", "admiral", "advice", "aerial", "agenda", "airport", "alarm", "album",
    "alley", "almond", "amber", "anchor", "angle", "ankle", "antenna", "anvil",
    "apple", "apron", "arcade", "archive", "arena", "armor", "arrow", "artist",
    "aspect", "atlas", "attic", "auction", "autumn", "avenue", "badge", "bakery",
    "balcony", "ballot", "bamboo", "banner", "barrel", "basin", "basket", "beacon",
    "beetle", "bellows", "bench", "berry", "bicycle", "billow", "biscuit", "blanket",
    "blossom", "boiler", "bonfire", "border", "bottle", "boulder", "bracket", "branch",
    "breeze", "bridge", "bronze", "bucket", "buffalo", "bundle", "burrow", "butter",
    "cabin", "cactus", "camera", "canal", "candle", "canopy", "canyon", "captain",
    "caravan", "carbon", "cargo", "carpet", "castle", "cedar", "cellar", "census",
    "chalk", "channel", "chapter", "charter", "cherry", "chimney", "cinder", "circuit",
    "citadel", "clarity", "clover", "cobalt", "coffee", "comet", "compass", "copper",
    "coral", "cottage", "cradle", "crater", "crystal", "current", "cushion", "cypress",
    "dagger", "dairy", "dancer", "dawn", "decade", "delta", "desert", "diamond",
    "dinner", "domain", "dragon", "drizzle", "dune", "dynamo", "eagle", "echo",
    "eclipse", "elbow", "ember", "emerald", "engine", "envoy", "estate", "evening",
    "fabric", "falcon", "feather", "ferry", "fiddle", "figure", "flannel", "fleet",
    "forest", "fossil", "fountain", "frost", "galaxy", "garden", "garnet", "gazette",
    "geyser", "glacier", "goblet", "granite", "gravel", "harbor", "harvest", "hazel",
    "helmet", "heron", "hinge", "horizon", "hunter", "island", "ivory", "jacket",
    "jasmine", "journal", "jungle", "kernel", "kettle", "kingdom", "lantern", "lattice",
    "ledger", "lemon", "lilac", "linen", "lobster", "locket", "lumber", "magnet",
    "mantle", "marble", "meadow", "mercury", "meteor", "mirror", "monsoon", "mosaic",
    "mustard", "nebula", "needle", "nickel", "oasis", "object", "orchard", "origin",
    "paddle", "palace", "parcel", "pebble", "pepper", "pigeon", "pillar", "planet",
    "plaza", "pocket", "pollen", "portal", "quarry", "quartz", "quiver", "rabbit",
    "radar", "raven", "reef", "ribbon", "river", "rocket", "saddle", "salmon",
    "satin", "scarlet", "schooner", "shadow", "signal", "silver", "socket", "spindle",
    "stable", "summit", "thistle", "thunder", "timber", "tunnel", "valley", "velvet",
    "walnut", "willow", "window", "winter", "yarrow", "zenith", "zephyr", "zinc",
];

/// Pick one random word from the embedded list.
pub fn random_word<R: Rng>(rng: &mut R) -> &'static str {
    WORDS[rng.random_range(0..WORDS.len())]
}

/// Join `count` random words with single spaces.
pub fn random_words<R: Rng>(rng: &mut R, count: usize) -> String {
    let mut text = String::with_capacity(count * 8);
    for i in 0..count {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(random_word(rng));
    }
    text
}

/// Fixed set of category strings owned by one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPool {
    entries: Vec<&'static str>,
}

impl CategoryPool {
    /// Draw a pool of `CATEGORY_POOL_SIZE` words. Entries may repeat.
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        let entries = (0..CATEGORY_POOL_SIZE).map(|_| random_word(rng)).collect();
        Self { entries }
    }

    /// Pick one entry from the pool.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &'static str {
        self.entries[rng.random_range(0..self.entries.len())]
    }

    pub fn entries(&self) -> &[&'static str] {
        &self.entries
    }
}
