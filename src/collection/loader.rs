use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::record::MatchRecord;
use crate::core::types::{GenomePairKey, MatchCollection, Source};
use crate::parsing::input::{read_report, strip_comments};
use crate::parsing::refined::{parse_refined_matches, ParseError};

/// Default minimum score for a match to be counted
pub const DEFAULT_MIN_SCORE: f64 = 181.0;

/// Marker for checksum side files that live next to match files
const CHECKSUM_MARKER: &str = ".sha2.";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Results directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Settings applied while aggregating match files into a collection
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Inclusive lower bound on a record's score
    pub min_score: f64,

    /// When set, files for any other genome pair are skipped without parsing
    pub allowed_pairs: Option<HashSet<GenomePairKey>>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            allowed_pairs: None,
        }
    }
}

impl LoaderConfig {
    #[must_use]
    pub fn new(min_score: f64) -> Self {
        Self {
            min_score,
            allowed_pairs: None,
        }
    }

    #[must_use]
    pub fn with_allowed_pairs<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = GenomePairKey>,
    {
        self.allowed_pairs = Some(pairs.into_iter().collect());
        self
    }

    #[must_use]
    pub fn is_allowed(&self, key: &GenomePairKey) -> bool {
        self.allowed_pairs
            .as_ref()
            .map_or(true, |allowed| allowed.contains(key))
    }
}

/// A match file and the genome pair derived from its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFile {
    pub key: GenomePairKey,
    pub path: PathBuf,
}

/// Derive the second genome from a match file name.
///
/// The name is cut at the first `_`, then at the first `.gz`:
/// `GenomeB_part1.gz` and `GenomeB.gz` both give `GenomeB`.
#[must_use]
pub fn genome_from_file_name(file_name: &str) -> &str {
    let stem = file_name.split_once('_').map_or(file_name, |(head, _)| head);
    stem.split_once(".gz").map_or(stem, |(head, _)| head)
}

/// Find every match file below `root`.
///
/// Each directory below `root` (at any depth, not `root` itself) is named after
/// the first genome; each regular file in it belongs to the pair formed with
/// the genome named by the file. Checksum files are ignored. Results are
/// sorted by path.
///
/// # Errors
///
/// Returns `LoadError::MissingDirectory` if `root` is not a directory, or
/// `LoadError::Io` if a directory cannot be listed.
pub fn discover_match_files(root: &Path) -> Result<Vec<MatchFile>, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::MissingDirectory(root.to_path_buf()));
    }

    let mut directories = Vec::new();
    collect_directories(root, &mut directories)?;

    let mut files = Vec::new();
    for dir in directories {
        let Some(genome1) = dir.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };

        for path in sorted_entries(&dir)? {
            if !path.is_file() {
                continue;
            }
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if file_name.contains(CHECKSUM_MARKER) {
                continue;
            }

            let genome2 = genome_from_file_name(&file_name);
            files.push(MatchFile {
                key: GenomePairKey::new(genome1.clone(), genome2),
                path,
            });
        }
    }

    Ok(files)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        entries.push(entry.map_err(io_error)?.path());
    }
    entries.sort();
    Ok(entries)
}

/// Depth-first, parents before children. Symlinked directories are not followed.
fn collect_directories(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    for path in sorted_entries(dir)? {
        let is_dir = std::fs::symlink_metadata(&path)
            .map(|m| m.file_type().is_dir())
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
        if is_dir {
            out.push(path.clone());
            collect_directories(&path, out)?;
        }
    }
    Ok(())
}

/// Groups parsed records by genome pair for one source.
///
/// Files are parsed one at a time, fully, in the order they are added.
pub struct Aggregator<'a> {
    source: Source,
    config: &'a LoaderConfig,
    collection: MatchCollection,
    files_read: usize,
    files_skipped: usize,
}

impl<'a> Aggregator<'a> {
    #[must_use]
    pub fn new(source: Source, config: &'a LoaderConfig) -> Self {
        Self {
            source,
            config,
            collection: MatchCollection::new(),
            files_read: 0,
            files_skipped: 0,
        }
    }

    /// Parse one match file and add its passing records.
    ///
    /// Returns `false` if the file's genome pair is not allowed and the file
    /// was skipped.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Io` if the file cannot be read or decompressed, or
    /// `LoadError::Parse` if its content does not follow the report grammar.
    pub fn add_file(&mut self, file: &MatchFile) -> Result<bool, LoadError> {
        if !self.config.is_allowed(&file.key) {
            debug!(path = %file.path.display(), "Skipping genome pair file");
            self.files_skipped += 1;
            return Ok(false);
        }

        debug!(source = %self.source, path = %file.path.display(), "Reading match file");
        let text = read_report(&file.path).map_err(|source| LoadError::Io {
            path: file.path.clone(),
            source,
        })?;
        let kept = self
            .ingest(file.key.clone(), &text)
            .map_err(|source| LoadError::Parse {
                path: file.path.clone(),
                source,
            })?;
        debug!(path = %file.path.display(), kept, "Parsed match file");

        self.files_read += 1;
        Ok(true)
    }

    /// Parse report text for a genome pair and add its passing records.
    ///
    /// Comment lines are removed first. Returns the number of records kept, or
    /// `None` if the pair is not allowed.
    ///
    /// # Errors
    ///
    /// Returns the `ParseError` if the text does not follow the report grammar.
    pub fn add_text(
        &mut self,
        key: GenomePairKey,
        text: &str,
    ) -> Result<Option<usize>, ParseError> {
        if !self.config.is_allowed(&key) {
            self.files_skipped += 1;
            return Ok(None);
        }
        let kept = self.ingest(key, &strip_comments(text))?;
        self.files_read += 1;
        Ok(Some(kept))
    }

    fn ingest(&mut self, key: GenomePairKey, text: &str) -> Result<usize, ParseError> {
        let min_score = self.config.min_score;
        let records = parse_refined_matches(text)
            .filter(|result| {
                result
                    .as_ref()
                    .map_or(true, |record| record.passes_min_score(min_score))
            })
            .collect::<Result<Vec<MatchRecord>, ParseError>>()?;

        let kept = records.len();
        self.collection.extend(key, records);
        Ok(kept)
    }

    #[must_use]
    pub fn files_skipped(&self) -> usize {
        self.files_skipped
    }

    #[must_use]
    pub fn finish(self) -> MatchCollection {
        info!(
            source = %self.source,
            files = self.files_read,
            skipped = self.files_skipped,
            pairs = self.collection.len(),
            records = self.collection.record_count(),
            "Loaded match collection"
        );
        self.collection
    }
}

/// Discover and aggregate every match file below `root`.
///
/// # Errors
///
/// Returns the first `LoadError` encountered; there is no partial recovery.
pub fn load_matches(
    root: &Path,
    source: Source,
    config: &LoaderConfig,
) -> Result<MatchCollection, LoadError> {
    let mut aggregator = Aggregator::new(source, config);
    for file in discover_match_files(root)? {
        aggregator.add_file(&file)?;
    }
    Ok(aggregator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Range;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const REPORT: &str = "# header comment\n\
        RefinedMatches([NULL,[1,2,181.5,200.0,10..20,15..25,181],\n\
        [3,4,180.9,1.0,1..2,1..2,0.5]]);\n";

    fn write_gz(path: &Path, text: &str) {
        let mut encoder = GzEncoder::new(std::fs::File::create(path).unwrap(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn test_genome_from_file_name() {
        assert_eq!(genome_from_file_name("GenomeB"), "GenomeB");
        assert_eq!(genome_from_file_name("GenomeB.gz"), "GenomeB");
        assert_eq!(genome_from_file_name("GenomeB_part1.gz"), "GenomeB");
        assert_eq!(genome_from_file_name("Genome.gzB_1"), "Genome");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let config = LoaderConfig::new(181.0);
        let mut aggregator = Aggregator::new(Source::Reference, &config);
        let key = GenomePairKey::new("A", "B");

        let kept = aggregator.add_text(key.clone(), REPORT).unwrap();
        assert_eq!(kept, Some(1));

        let collection = aggregator.finish();
        let records = collection.get(&key).unwrap();
        assert_eq!(
            records,
            &[MatchRecord::new(1, 2, Range::new(10, 20), Range::new(15, 25), 181)]
        );
    }

    #[test]
    fn test_fractional_threshold() {
        let config = LoaderConfig::new(180.5);
        let mut aggregator = Aggregator::new(Source::Reference, &config);
        // 180.9 truncates to 180, which is below 180.5
        let kept = aggregator
            .add_text(GenomePairKey::new("A", "B"), REPORT)
            .unwrap();
        assert_eq!(kept, Some(1));
    }

    #[test]
    fn test_allowed_pairs_skip_text() {
        let config = LoaderConfig::new(0.0).with_allowed_pairs([GenomePairKey::new("A", "B")]);
        let mut aggregator = Aggregator::new(Source::Reference, &config);

        assert_eq!(
            aggregator.add_text(GenomePairKey::new("A", "C"), "not parsed").unwrap(),
            None
        );
        assert_eq!(aggregator.files_skipped(), 1);
        assert!(aggregator.finish().is_empty());
    }

    #[test]
    fn test_parse_error_propagates() {
        let config = LoaderConfig::default();
        let mut aggregator = Aggregator::new(Source::Candidate, &config);
        let result = aggregator.add_text(GenomePairKey::new("A", "B"), "RefinedMatches([");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_matches_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let genome_a = dir.path().join("GenomeA");
        std::fs::create_dir(&genome_a).unwrap();
        write_gz(&genome_a.join("GenomeB.gz"), REPORT);
        std::fs::write(genome_a.join("GenomeC_1"), REPORT).unwrap();
        std::fs::write(genome_a.join("GenomeC_2"), "RefinedMatches([]);\n").unwrap();
        std::fs::write(genome_a.join("GenomeB.sha2.txt"), "garbage").unwrap();
        // Files directly under the root have no first genome and are ignored
        std::fs::write(dir.path().join("stray"), "garbage").unwrap();

        let collection =
            load_matches(dir.path(), Source::Reference, &LoaderConfig::default()).unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.get(&GenomePairKey::new("GenomeA", "GenomeB")).map(<[_]>::len),
            Some(1)
        );
        assert_eq!(
            collection.get(&GenomePairKey::new("GenomeA", "GenomeC")).map(<[_]>::len),
            Some(1)
        );
    }

    #[test]
    fn test_nested_directories_use_last_component() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("batch1").join("GenomeX");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("GenomeY"), REPORT).unwrap();

        let files = discover_match_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![MatchFile {
                key: GenomePairKey::new("GenomeX", "GenomeY"),
                path: nested.join("GenomeY"),
            }]
        );
    }

    #[test]
    fn test_allowed_pairs_skip_files_without_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let genome_a = dir.path().join("GenomeA");
        std::fs::create_dir(&genome_a).unwrap();
        std::fs::write(genome_a.join("GenomeB"), REPORT).unwrap();
        std::fs::write(genome_a.join("GenomeC"), "not a report").unwrap();

        let config =
            LoaderConfig::default().with_allowed_pairs([GenomePairKey::new("GenomeA", "GenomeB")]);
        let collection = load_matches(dir.path(), Source::Reference, &config).unwrap();

        assert_eq!(
            collection.key_set().into_iter().collect::<Vec<_>>(),
            vec![GenomePairKey::new("GenomeA", "GenomeB")]
        );
    }

    #[test]
    fn test_load_reports_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let genome_a = dir.path().join("GenomeA");
        std::fs::create_dir(&genome_a).unwrap();
        std::fs::write(genome_a.join("GenomeB"), "RefinedMatches([[1,2]]);").unwrap();

        let err = load_matches(dir.path(), Source::Candidate, &LoaderConfig::default())
            .unwrap_err();
        match err {
            LoadError::Parse { path, .. } => assert_eq!(path, genome_a.join("GenomeB")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_directory() {
        let result = load_matches(
            Path::new("/nonexistent/results"),
            Source::Reference,
            &LoaderConfig::default(),
        );
        assert!(matches!(result, Err(LoadError::MissingDirectory(_))));
    }
}
