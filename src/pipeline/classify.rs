//! Genre classification of enriched tracks.
//!
//! Every track ends up in exactly one of ten [`Genre`] buckets. Two signals are
//! available: the audio features of the track and the genre tags of its first
//! artist. Which ones are used is chosen with a [`Strategy`].

use std::{collections::BTreeMap, fmt, str::FromStr};

use clap::ValueEnum;
use indicatif::ProgressBar;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::types::{AudioFeatures, EnrichedTrack};

/// Tracks per genre. Ordered by genre so output and caches are stable.
pub type GenreGroups = BTreeMap<Genre, Vec<EnrichedTrack>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[default]
    Pop,
    Rock,
    #[serde(rename = "Hip-Hop")]
    HipHop,
    Electronic,
    Jazz,
    Classical,
    Country,
    #[serde(rename = "R&B")]
    RnB,
    Indie,
    Alternative,
}

impl Genre {
    pub const ALL: [Genre; 10] = [
        Genre::Pop,
        Genre::Rock,
        Genre::HipHop,
        Genre::Electronic,
        Genre::Jazz,
        Genre::Classical,
        Genre::Country,
        Genre::RnB,
        Genre::Indie,
        Genre::Alternative,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Pop => "Pop",
            Genre::Rock => "Rock",
            Genre::HipHop => "Hip-Hop",
            Genre::Electronic => "Electronic",
            Genre::Jazz => "Jazz",
            Genre::Classical => "Classical",
            Genre::Country => "Country",
            Genre::RnB => "R&B",
            Genre::Indie => "Indie",
            Genre::Alternative => "Alternative",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = String;

    /// Accepts the display name in any case, with or without punctuation,
    /// e.g. `hip-hop`, `HipHop`, `r&b` or `rnb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "pop" => Ok(Genre::Pop),
            "rock" => Ok(Genre::Rock),
            "hiphop" => Ok(Genre::HipHop),
            "electronic" => Ok(Genre::Electronic),
            "jazz" => Ok(Genre::Jazz),
            "classical" => Ok(Genre::Classical),
            "country" => Ok(Genre::Country),
            "rb" | "rnb" => Ok(Genre::RnB),
            "indie" => Ok(Genre::Indie),
            "alternative" => Ok(Genre::Alternative),
            _ => Err(format!(
                "unknown genre '{}', expected one of: {}",
                s,
                Genre::ALL.map(|g| g.name()).join(", ")
            )),
        }
    }
}

/// The four audio features the threshold rules look at, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioProfile {
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub acousticness: f64,
}

impl AudioProfile {
    /// Draws every value uniformly from `0.0..1.0`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            danceability: rng.random::<f64>(),
            energy: rng.random::<f64>(),
            valence: rng.random::<f64>(),
            acousticness: rng.random::<f64>(),
        }
    }

    /// Threshold rules, first match wins.
    pub fn genre(&self) -> Genre {
        if self.energy > 0.8 && self.danceability > 0.7 {
            Genre::Electronic
        } else if self.acousticness > 0.7 {
            Genre::Indie
        } else if self.energy > 0.7 {
            Genre::Rock
        } else if self.danceability > 0.8 {
            Genre::HipHop
        } else if self.valence < 0.3 {
            Genre::Alternative
        } else {
            Genre::Pop
        }
    }
}

impl From<&AudioFeatures> for AudioProfile {
    fn from(features: &AudioFeatures) -> Self {
        Self {
            danceability: features.danceability,
            energy: features.energy,
            valence: features.valence,
            acousticness: features.acousticness,
        }
    }
}

/// Keywords per bucket. Checked top to bottom, so more specific buckets come
/// first: "indie rock" is Indie, "pop rap" is Hip-Hop.
const TAG_KEYWORDS: &[(Genre, &[&str])] = &[
    (Genre::HipHop, &["hip hop", "rap", "trap", "drill", "grime", "boom bap"]),
    (Genre::RnB, &["r&b", "rnb", "soul", "neo soul", "motown"]),
    (Genre::Jazz, &["jazz", "bebop", "swing", "big band"]),
    (
        Genre::Classical,
        &["classical", "orchestra", "orchestral", "baroque", "opera", "choral"],
    ),
    (Genre::Country, &["country", "bluegrass", "americana", "honky tonk"]),
    (
        Genre::Electronic,
        &[
            "edm", "house", "techno", "trance", "electronic", "electro", "electronica",
            "dubstep", "drum and bass", "dnb", "synthwave", "ambient",
        ],
    ),
    (Genre::Indie, &["indie", "lo fi", "bedroom pop"]),
    (
        Genre::Alternative,
        &["alternative", "grunge", "emo", "shoegaze", "post punk", "new wave"],
    ),
    (Genre::Rock, &["rock", "metal", "punk", "hardcore"]),
    (Genre::Pop, &["pop"]),
];

/// Bucket a single artist tag belongs to, if any.
pub fn genre_for_tag(tag: &str) -> Option<Genre> {
    let normalized = format!(" {} ", tag.to_lowercase().replace(['-', '_'], " "));

    TAG_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| normalized.contains(&format!(" {keyword} ")))
        })
        .map(|(genre, _)| *genre)
}

/// Bucket most tags vote for; ties go to the bucket of the earliest tag.
pub fn genre_from_tags(tags: &[String]) -> Option<Genre> {
    let mut votes: Vec<(Genre, usize)> = Vec::new();

    for genre in tags.iter().filter_map(|tag| genre_for_tag(tag)) {
        match votes.iter_mut().find(|(g, _)| *g == genre) {
            Some((_, count)) => *count += 1,
            None => votes.push((genre, 1)),
        }
    }

    // max_by_key returns the last maximum, so walk the votes backwards
    votes
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(genre, _)| genre)
}

pub trait GenreClassifier {
    fn classify(&mut self, track: &EnrichedTrack) -> Genre;
}

/// How tracks are assigned to genres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Random audio profile per track, ignoring all metadata
    Random,
    /// Audio features of the track, random profile when Spotify has none
    Features,
    /// Genre tags of the first artist, Pop when no tag matches
    Tags,
    /// Genre tags first, audio features when no tag matches
    #[default]
    Hybrid,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Random => "random",
            Strategy::Features => "features",
            Strategy::Tags => "tags",
            Strategy::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Applies the threshold rules to a track's audio profile.
pub struct ThresholdClassifier<R> {
    rng: R,
    use_audio_features: bool,
}

impl<R: Rng> ThresholdClassifier<R> {
    /// Classifies with a freshly drawn random profile for every track.
    pub fn random(rng: R) -> Self {
        Self {
            rng,
            use_audio_features: false,
        }
    }

    /// Classifies with the track's audio features, drawing a random profile
    /// only for tracks without features.
    pub fn features(rng: R) -> Self {
        Self {
            rng,
            use_audio_features: true,
        }
    }

    pub fn profile(&mut self, track: &EnrichedTrack) -> AudioProfile {
        match (&track.audio_features, self.use_audio_features) {
            (Some(features), true) => AudioProfile::from(features),
            _ => AudioProfile::random(&mut self.rng),
        }
    }
}

impl<R: Rng> GenreClassifier for ThresholdClassifier<R> {
    fn classify(&mut self, track: &EnrichedTrack) -> Genre {
        self.profile(track).genre()
    }
}

/// Votes with the artist's genre tags, deferring to `fallback` when none match.
pub struct TagClassifier<F> {
    fallback: Option<F>,
}

impl TagClassifier<ThresholdClassifier<StdRng>> {
    pub fn tags_only() -> Self {
        Self { fallback: None }
    }
}

impl<F: GenreClassifier> TagClassifier<F> {
    pub fn with_fallback(fallback: F) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }
}

impl<F: GenreClassifier> GenreClassifier for TagClassifier<F> {
    fn classify(&mut self, track: &EnrichedTrack) -> Genre {
        if let Some(genre) = genre_from_tags(&track.genres) {
            return genre;
        }

        match self.fallback.as_mut() {
            Some(fallback) => fallback.classify(track),
            None => Genre::default(),
        }
    }
}

/// Builds the classifier for `strategy`. A `seed` makes random draws repeatable.
pub fn classifier(strategy: Strategy, seed: Option<u64>) -> Box<dyn GenreClassifier> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    match strategy {
        Strategy::Random => Box::new(ThresholdClassifier::random(rng)),
        Strategy::Features => Box::new(ThresholdClassifier::features(rng)),
        Strategy::Tags => Box::new(TagClassifier::tags_only()),
        Strategy::Hybrid => Box::new(TagClassifier::with_fallback(
            ThresholdClassifier::features(rng),
        )),
    }
}

/// Sorts `tracks` into genre buckets, keeping library order inside a bucket.
pub fn group_by_genre(
    tracks: &[EnrichedTrack],
    classifier: &mut dyn GenreClassifier,
    pb: &ProgressBar,
) -> GenreGroups {
    pb.set_length(tracks.len() as u64);
    pb.set_position(0);
    pb.set_message("Analyzing genres...");

    let mut groups = GenreGroups::new();
    for track in tracks {
        let genre = classifier.classify(track);
        groups.entry(genre).or_default().push(track.clone());
        pb.inc(1);
    }

    groups
}
