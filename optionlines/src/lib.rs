//! OptionLines: a line-oriented, human-editable text format that mixes option
//! declarations (`key :: a | b | c`) with task lines (`* [x] description`).
//! Modules keep the core pure: a text blob goes in, a validated document comes
//! out, and the document renders back to one canonical text blob.

pub mod core {
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeSet;
    use std::fmt;

    /* ------------------------------ Constants ------------------------------ */

    pub const COMMENT_MARKER: char = '#';
    pub const KEY_OPTIONS_SEPARATOR: &str = "::";
    /// Separates options and starts an option continuation line.
    pub const OPTION_DELIMITER: char = '|';
    pub const DEFAULT_MAX_LINE_LENGTH: usize = 70;
    /// Columns taken by `" :: "` between the key column and the options.
    pub const SEPARATOR_WIDTH: usize = 4;
    /// Columns reserved in front of a task's status box for its emphasis marker.
    pub const EMPHASIS_WIDTH: usize = 2;

    pub type Result<T, E = OptionLinesError> = std::result::Result<T, E>;

    /* ---------------------------- Task markers ---------------------------- */

    /// How pressing a task is, written in front of the status box.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum Emphasis {
        NonUrgent, // (none)
        Urgent,    // *
        Today,     // **
    }

    impl Emphasis {
        pub fn from_marker(marker: &str) -> Option<Self> {
            match marker {
                "" => Some(Self::NonUrgent),
                "*" => Some(Self::Urgent),
                "**" => Some(Self::Today),
                _ => None,
            }
        }

        pub fn marker(self) -> &'static str {
            match self {
                Self::NonUrgent => "",
                Self::Urgent => "*",
                Self::Today => "**",
            }
        }

        pub fn as_str(self) -> &'static str {
            match self {
                Self::NonUrgent => "non-urgent",
                Self::Urgent => "urgent",
                Self::Today => "today",
            }
        }
    }

    impl fmt::Display for Emphasis {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Progress of a task, written inside the status box.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum TaskStatus {
        ToDo,      // [ ]
        Started,   // [/]
        Finished,  // [x]
        Cancelled, // [-]
        Later,     // [>]
    }

    impl TaskStatus {
        pub fn from_marker(marker: &str) -> Option<Self> {
            match marker {
                "" => Some(Self::ToDo),
                "/" => Some(Self::Started),
                "x" => Some(Self::Finished),
                "-" => Some(Self::Cancelled),
                ">" => Some(Self::Later),
                _ => None,
            }
        }

        pub fn marker(self) -> &'static str {
            match self {
                Self::ToDo => "",
                Self::Started => "/",
                Self::Finished => "x",
                Self::Cancelled => "-",
                Self::Later => ">",
            }
        }

        pub fn as_str(self) -> &'static str {
            match self {
                Self::ToDo => "to-do",
                Self::Started => "started",
                Self::Finished => "finished",
                Self::Cancelled => "cancelled",
                Self::Later => "later",
            }
        }
    }

    impl fmt::Display for TaskStatus {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /* ------------------------------ Line values ------------------------------ */

    /// A key bound to its set of allowed options. Both are lower-cased.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct OptionDeclaration {
        pub key: String,
        #[serde(default)]
        pub options: BTreeSet<String>,
    }

    impl OptionDeclaration {
        pub fn contains(&self, option: &str) -> bool {
            self.options.contains(option)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Task {
        pub emphasis: Emphasis,
        pub status: TaskStatus,
        pub description: String,
    }

    /// The grammatical kind of a line, with the fields only that kind carries.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "kebab-case")]
    pub enum LineKind {
        Blank,
        Comment,
        OptionDeclaration(OptionDeclaration),
        OptionContinuation,
        Task(Task),
        TaskContinuation,
        /// Free text that belongs to no task; kept verbatim, indexed nowhere.
        Ordinary,
    }

    impl LineKind {
        pub fn name(&self) -> &'static str {
            match self {
                Self::Blank => "blank",
                Self::Comment => "comment",
                Self::OptionDeclaration(_) => "option-declaration",
                Self::OptionContinuation => "option-continuation",
                Self::Task(_) => "task",
                Self::TaskContinuation => "task-continuation",
                Self::Ordinary => "ordinary",
            }
        }

        /// The primary kind a continuation line must attach to.
        pub fn continues(&self) -> Option<OwnerKind> {
            match self {
                Self::OptionContinuation => Some(OwnerKind::OptionDeclaration),
                Self::TaskContinuation => Some(OwnerKind::Task),
                _ => None,
            }
        }

        /// The continuation family this kind owns when it is a primary line.
        pub fn owns(&self) -> Option<OwnerKind> {
            match self {
                Self::OptionDeclaration(_) => Some(OwnerKind::OptionDeclaration),
                Self::Task(_) => Some(OwnerKind::Task),
                _ => None,
            }
        }
    }

    /// One classified line: its indent, its text after the indent, and its kind.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LineRecord {
        /// Leading whitespace columns. Tasks without emphasis store two fewer
        /// so descriptions line up with emphasised tasks.
        pub indent: usize,
        pub raw_text: String,
        #[serde(flatten)]
        pub kind: LineKind,
    }

    impl LineRecord {
        pub fn as_declaration(&self) -> Option<&OptionDeclaration> {
            match &self.kind {
                LineKind::OptionDeclaration(decl) => Some(decl),
                _ => None,
            }
        }

        pub fn as_task(&self) -> Option<&Task> {
            match &self.kind {
                LineKind::Task(task) => Some(task),
                _ => None,
            }
        }

        pub fn into_ordinary(self) -> Self {
            Self {
                kind: LineKind::Ordinary,
                ..self
            }
        }
    }

    /// A primary line plus the continuation lines attached to it.
    ///
    /// `logical` is the primary text joined with every continuation text and
    /// classified again, so it carries the full option set or description.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CompositeLine {
        pub primary: LineRecord,
        #[serde(default)]
        pub continuations: Vec<LineRecord>,
        pub logical: LineRecord,
    }

    /* ---------------------------- Configuration ---------------------------- */

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct OptionLinesConfig {
        /// Width that option lists are wrapped to when formatting.
        pub max_line_length: usize,
    }

    impl Default for OptionLinesConfig {
        fn default() -> Self {
            Self {
                max_line_length: DEFAULT_MAX_LINE_LENGTH,
            }
        }
    }

    /* ---------------------------- Errors (domain) ---------------------------- */

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum OwnerKind {
        OptionDeclaration,
        Task,
    }

    impl fmt::Display for OwnerKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::OptionDeclaration => f.write_str("option declaration"),
                Self::Task => f.write_str("task"),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    pub enum OptionLinesError {
        /// Not produced by the classifier: empty text is a blank line and any
        /// other text falls back to a task continuation.
        #[error("unknown line type for option line {line:?}")]
        UnknownLineKind { line: String },
        #[error("bad key {key:?} in line {line:?}")]
        BadKey { key: String, line: String },
        #[error("bad option line sequence: continuation with no owning {expected}: {line:?}")]
        BadSequence { line: String, expected: OwnerKind },
        #[error("duplicate option keys found: {key:?}")]
        DuplicateKey { key: String },
        #[error(
            "duplicate options for different keys (\"{previous_key}::{option}\" and \"{new_key}::{option}\")"
        )]
        DuplicateOption {
            option: String,
            previous_key: String,
            new_key: String,
        },
        #[error("{key:?} not found as option key")]
        KeyNotFound { key: String },
        #[error("{} not found in {key:?} options: {}", option_list(.missing), option_list(.allowed))]
        OptionsNotSubset {
            key: String,
            missing: BTreeSet<String>,
            allowed: BTreeSet<String>,
        },
    }

    fn option_list(options: &BTreeSet<String>) -> String {
        let joined = options
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{}]", joined)
    }

}

pub mod classify {
    //! Line classifier built on `nom`.
    //!
    //! Kinds are tried in a fixed order (comment, blank, task, option
    //! declaration, option continuation, task continuation) and the first one
    //! whose grammar accepts the line wins. Assembled logical lines go through
    //! the same path as physical ones.

    use crate::core::*;
    use nom::{
        IResult,
        bytes::complete::{tag, take_till, take_until},
        character::complete::char,
        error::VerboseError,
        sequence::{terminated, tuple},
    };
    use std::collections::BTreeSet;
    use tracing::trace;

    type PResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

    /* ------------------------ Public entry points ------------------------ */

    /// Classify one line. Trailing whitespace (including `\r`) is dropped and
    /// leading whitespace becomes the indent.
    pub fn classify_line(source_line: &str) -> Result<LineRecord> {
        let source = source_line.trim_end();
        let text = source.trim_start();
        let indent = source.chars().count() - text.chars().count();
        let record = classify_content(indent, text)?;
        trace!(kind = record.kind.name(), indent = record.indent, "classified line");
        Ok(record)
    }

    fn classify_content(indent: usize, text: &str) -> Result<LineRecord> {
        let kind = if text.starts_with(COMMENT_MARKER) {
            LineKind::Comment
        } else if text.is_empty() {
            LineKind::Blank
        } else if let Some(task) = parse_task(text) {
            let indent = match task.emphasis {
                Emphasis::NonUrgent => indent.saturating_sub(EMPHASIS_WIDTH),
                _ => indent,
            };
            return Ok(LineRecord {
                indent,
                raw_text: text.to_string(),
                kind: LineKind::Task(task),
            });
        } else if let Some(decl) = parse_option_declaration(text)? {
            LineKind::OptionDeclaration(decl)
        } else if text.starts_with(OPTION_DELIMITER) {
            LineKind::OptionContinuation
        } else {
            LineKind::TaskContinuation
        };
        Ok(LineRecord {
            indent,
            raw_text: text.to_string(),
            kind,
        })
    }

    /* ------------------------------ Tasks ------------------------------ */

    /// `<emphasis>[<status>]`, with exactly one `[` before the first `]`.
    fn task_markers(i: &str) -> PResult<'_, (&str, &str)> {
        tuple((
            terminated(take_till(|c: char| c == '[' || c == ']'), char('[')),
            terminated(take_till(|c: char| c == '[' || c == ']'), char(']')),
        ))(i)
    }

    /// Parse a task line such as `* [x] Contact agency`. Returns `None` when
    /// the brackets are malformed, a marker is unknown, or the description is
    /// empty.
    pub fn parse_task(text: &str) -> Option<Task> {
        let (description, (emphasis, status)) = task_markers(text).ok()?;
        let emphasis = Emphasis::from_marker(emphasis.trim())?;
        let status = TaskStatus::from_marker(status.trim())?;
        let description = description.trim();
        if description.is_empty() {
            return None;
        }
        Some(Task {
            emphasis,
            status,
            description: description.to_string(),
        })
    }

    /* -------------------------- Option declarations -------------------------- */

    fn key_and_options(i: &str) -> PResult<'_, &str> {
        terminated(take_until(KEY_OPTIONS_SEPARATOR), tag(KEY_OPTIONS_SEPARATOR))(i)
    }

    /// Parse `key :: a | b`. Only the first separator splits; the rest of the
    /// line is the option list. `Ok(None)` means the line is not a declaration.
    pub fn parse_option_declaration(text: &str) -> Result<Option<OptionDeclaration>> {
        // A continuation line never declares a key, even when an option has `::`.
        if text.starts_with(OPTION_DELIMITER) {
            return Ok(None);
        }
        let Ok((options, key)) = key_and_options(text) else {
            return Ok(None);
        };
        let key = key.trim();
        if key.split_whitespace().count() != 1 {
            return Err(OptionLinesError::BadKey {
                key: key.to_string(),
                line: text.to_string(),
            });
        }
        Ok(Some(OptionDeclaration {
            key: key.to_lowercase(),
            options: split_options(options),
        }))
    }

    /// Split an option list on `|`, dropping empty entries and folding case.
    pub fn split_options(text: &str) -> BTreeSet<String> {
        text.split(OPTION_DELIMITER)
            .map(str::trim)
            .filter(|option| !option.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

}

pub mod assemble {
    //! Groups continuation lines with the primary line they extend.
    //!
    //! `|` lines extend the nearest option declaration; plain text lines extend
    //! the nearest task. Each group is joined and classified again as one
    //! logical line.

    use crate::classify::classify_line;
    use crate::core::*;
    use tracing::debug;

    struct PendingLine<'a> {
        source: &'a str,
        primary: LineRecord,
        continuations: Vec<LineRecord>,
    }

    impl<'a> PendingLine<'a> {
        fn new(source: &'a str, primary: LineRecord) -> Self {
            Self {
                source: source.trim_end(),
                primary,
                continuations: Vec::new(),
            }
        }

        fn owner(&self) -> Option<OwnerKind> {
            self.primary.kind.owns()
        }

        fn finish(self) -> Result<CompositeLine> {
            let logical = if self.continuations.is_empty() {
                self.primary.clone()
            } else {
                let mut joined = self.source.to_string();
                for line in &self.continuations {
                    joined.push(' ');
                    joined.push_str(&line.raw_text);
                }
                classify_line(&joined)?
            };
            Ok(CompositeLine {
                primary: self.primary,
                continuations: self.continuations,
                logical,
            })
        }
    }

    /// Split `text` into lines and build the composite lines in order.
    pub fn assemble_lines(text: &str) -> Result<Vec<CompositeLine>> {
        let mut lines = Vec::new();
        let mut pending: Option<PendingLine<'_>> = None;

        for source in text.trim_end().lines() {
            let record = classify_line(source)?;
            let owner = pending.as_ref().and_then(PendingLine::owner);
            match (record.kind.continues(), owner) {
                (Some(wanted), Some(found)) if wanted == found => {
                    if let Some(current) = pending.as_mut() {
                        current.continuations.push(record);
                    }
                }
                (Some(OwnerKind::OptionDeclaration), _) => {
                    return Err(bad_sequence(source, OwnerKind::OptionDeclaration));
                }
                (continues, _) => {
                    let primary = match continues {
                        Some(OwnerKind::Task) => record.into_ordinary(),
                        _ => record,
                    };
                    if let Some(done) = pending.replace(PendingLine::new(source, primary)) {
                        lines.push(done.finish()?);
                    }
                }
            }
        }
        if let Some(done) = pending {
            lines.push(done.finish()?);
        }

        debug!(lines = lines.len(), "assembled option lines");
        Ok(lines)
    }

    fn bad_sequence(source: &str, expected: OwnerKind) -> OptionLinesError {
        OptionLinesError::BadSequence {
            line: source.trim_end().to_string(),
            expected,
        }
    }

}

pub mod document {
    //! The document model: ordered composite lines plus key, option and task
    //! indexes. Building one validates it; there is no partial update.

    use crate::assemble::assemble_lines;
    use crate::core::*;
    use indexmap::IndexMap;
    use serde::Serialize;
    use std::cmp::Reverse;
    use std::fmt;
    use std::str::FromStr;
    use tracing::debug;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct OptionLines {
        max_line_length: usize,
        lines: Vec<CompositeLine>,
        /// key -> position of its declaration in `lines`.
        keys: IndexMap<String, usize>,
        /// option -> owning key.
        options: IndexMap<String, String>,
        /// positions of task lines in `lines`.
        tasks: Vec<usize>,
    }

    impl Default for OptionLines {
        fn default() -> Self {
            Self::empty(DEFAULT_MAX_LINE_LENGTH)
        }
    }

    impl OptionLines {
        fn empty(max_line_length: usize) -> Self {
            Self {
                max_line_length,
                lines: Vec::new(),
                keys: IndexMap::new(),
                options: IndexMap::new(),
                tasks: Vec::new(),
            }
        }

        pub fn parse(text: &str) -> Result<Self> {
            Self::parse_with_config(text, &OptionLinesConfig::default())
        }

        pub fn parse_with_max_line_length(text: &str, max_line_length: usize) -> Result<Self> {
            Self::parse_with_config(text, &OptionLinesConfig { max_line_length })
        }

        pub fn parse_with_config(text: &str, config: &OptionLinesConfig) -> Result<Self> {
            let mut doc = Self::empty(config.max_line_length);
            for line in assemble_lines(text)? {
                doc.push_line(line)?;
            }
            debug!(
                lines = doc.lines.len(),
                keys = doc.keys.len(),
                options = doc.options.len(),
                tasks = doc.tasks.len(),
                "parsed option lines"
            );
            Ok(doc)
        }

        /// Replace the whole document with `text`. On error the current
        /// contents are kept.
        pub fn reparse(&mut self, text: &str) -> Result<()> {
            *self = Self::parse_with_max_line_length(text, self.max_line_length)?;
            Ok(())
        }

        fn push_line(&mut self, line: CompositeLine) -> Result<()> {
            let position = self.lines.len();
            match &line.logical.kind {
                LineKind::OptionDeclaration(decl) => self.index_declaration(position, decl)?,
                LineKind::Task(_) => self.tasks.push(position),
                _ => {}
            }
            self.lines.push(line);
            Ok(())
        }

        fn index_declaration(&mut self, position: usize, decl: &OptionDeclaration) -> Result<()> {
            if self.keys.contains_key(&decl.key) {
                return Err(OptionLinesError::DuplicateKey {
                    key: decl.key.clone(),
                });
            }
            for option in &decl.options {
                if let Some(previous_key) = self.options.get(option) {
                    return Err(OptionLinesError::DuplicateOption {
                        option: option.clone(),
                        previous_key: previous_key.clone(),
                        new_key: decl.key.clone(),
                    });
                }
            }
            self.keys.insert(decl.key.clone(), position);
            for option in &decl.options {
                self.options.insert(option.clone(), decl.key.clone());
            }
            Ok(())
        }

        /* ------------------------------ Queries ------------------------------ */

        pub fn max_line_length(&self) -> usize {
            self.max_line_length
        }

        /// Composite lines in document order.
        pub fn lines(&self) -> &[CompositeLine] {
            &self.lines
        }

        pub fn len(&self) -> usize {
            self.lines.len()
        }

        pub fn is_empty(&self) -> bool {
            self.lines.is_empty()
        }

        pub fn keys(&self) -> impl Iterator<Item = &str> {
            self.keys.keys().map(String::as_str)
        }

        pub fn declaration(&self, key: &str) -> Option<&OptionDeclaration> {
            let position = *self.keys.get(key)?;
            self.lines.get(position)?.logical.as_declaration()
        }

        pub fn declarations(&self) -> impl Iterator<Item = &OptionDeclaration> {
            self.keys
                .values()
                .filter_map(|&position| self.lines.get(position))
                .filter_map(|line| line.logical.as_declaration())
        }

        /// The declaration whose option set contains `option`.
        pub fn owner_of(&self, option: &str) -> Option<&OptionDeclaration> {
            self.declaration(self.options.get(option)?)
        }

        pub fn option_count(&self) -> usize {
            self.options.len()
        }

        pub fn tasks(&self) -> impl Iterator<Item = &Task> {
            self.tasks
                .iter()
                .filter_map(|&position| self.lines.get(position))
                .filter_map(|line| line.logical.as_task())
        }

        /// Tasks with `today` first, then `urgent`, then the rest; document
        /// order within each level.
        pub fn tasks_by_emphasis(&self) -> Vec<&Task> {
            let mut tasks: Vec<_> = self.tasks().collect();
            tasks.sort_by_key(|task| Reverse(task.emphasis));
            tasks
        }

        /// Widest key in characters, 0 when nothing is declared.
        pub fn max_key_width(&self) -> usize {
            self.keys
                .keys()
                .map(|key| key.chars().count())
                .max()
                .unwrap_or(0)
        }

        /* ---------------------------- Subset check ---------------------------- */

        /// Every key declared here must be declared in `outer`, with options
        /// that are a subset of the outer ones.
        pub fn check_is_option_subset_of(&self, outer: &OptionLines) -> Result<()> {
            for decl in self.declarations() {
                let Some(allowed) = outer.declaration(&decl.key) else {
                    debug!(key = %decl.key, "key missing from outer option lines");
                    return Err(OptionLinesError::KeyNotFound {
                        key: decl.key.clone(),
                    });
                };
                if !decl.options.is_subset(&allowed.options) {
                    let missing = decl
                        .options
                        .difference(&allowed.options)
                        .cloned()
                        .collect();
                    debug!(key = %decl.key, "options missing from outer option lines");
                    return Err(OptionLinesError::OptionsNotSubset {
                        key: decl.key.clone(),
                        missing,
                        allowed: allowed.options.clone(),
                    });
                }
            }
            Ok(())
        }

        pub fn is_option_subset_of(&self, outer: &OptionLines) -> bool {
            self.check_is_option_subset_of(outer).is_ok()
        }

        /* ------------------------------ Output ------------------------------ */

        /// Canonical text; `max_line_length` overrides the configured width.
        pub fn format(&self, max_line_length: Option<usize>) -> String {
            crate::format::format_option_lines(
                self,
                max_line_length.unwrap_or(self.max_line_length),
            )
        }

        pub fn formatted_lines(&self, max_line_length: Option<usize>) -> Vec<String> {
            self.format(max_line_length)
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl fmt::Display for OptionLines {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.format(None))
        }
    }

    impl FromStr for OptionLines {
        type Err = OptionLinesError;

        fn from_str(s: &str) -> Result<Self> {
            Self::parse(s)
        }
    }

}

pub mod format {
    //! Canonical rendering: aligned `::` columns, sorted options wrapped
    //! greedily across `|` continuation lines, everything else re-indented.

    use crate::core::*;
    use crate::document::OptionLines;
    use std::collections::BTreeSet;
    use tracing::debug;

    /// Columns taken by `" | "` between two options on one line.
    const JOIN_WIDTH: isize = 3;

    pub fn format_option_lines(doc: &OptionLines, max_line_length: usize) -> String {
        let key_width = doc.max_key_width();
        let option_width = max_line_length
            .checked_sub(key_width + SEPARATOR_WIDTH)
            .filter(|width| *width > 0);
        debug!(max_line_length, key_width, ?option_width, "formatting option lines");

        let mut out = Vec::with_capacity(doc.len());
        for line in doc.lines() {
            render_line(&mut out, line, key_width, option_width);
        }
        out.join("\n")
    }

    fn render_line(
        out: &mut Vec<String>,
        line: &CompositeLine,
        key_width: usize,
        option_width: Option<usize>,
    ) {
        let indent = " ".repeat(line.logical.indent);
        match &line.logical.kind {
            LineKind::Blank => out.push(String::new()),
            LineKind::OptionDeclaration(decl) => {
                let mut fragments = wrap_options(&decl.options, option_width).into_iter();
                let first = fragments.next().unwrap_or_default();
                let head = format!(
                    "{indent}{key:<key_width$} {KEY_OPTIONS_SEPARATOR} {first}",
                    key = decl.key
                );
                out.push(head.trim_end().to_string());
                let hanging = " ".repeat(key_width + SEPARATOR_WIDTH);
                for fragment in fragments {
                    out.push(format!("{indent}{hanging}{fragment}"));
                }
            }
            LineKind::Task(task) => {
                let head = line.primary.as_task().unwrap_or(task);
                out.push(format!("{indent}{}", render_task(head)));
                for extra in &line.continuations {
                    out.push(format!("{}{}", " ".repeat(extra.indent), extra.raw_text));
                }
            }
            _ => out.push(format!("{indent}{}", line.logical.raw_text)),
        }
    }

    /// `<emphasis>[<status>] description`, emphasis padded to its column.
    pub fn render_task(task: &Task) -> String {
        format!(
            "{:<EMPHASIS_WIDTH$}[{:<1}] {}",
            task.emphasis.marker(),
            task.status.marker(),
            task.description
        )
    }

    /// Split the sorted options into line fragments of at most `max_width`
    /// columns. Fragments after the first start with `"| "`. A single option
    /// wider than the budget gets a fragment of its own; `None` means no limit.
    pub fn wrap_options(options: &BTreeSet<String>, max_width: Option<usize>) -> Vec<String> {
        let limit = max_width.map(|width| width as isize);
        let mut fragments = Vec::new();
        let mut current = String::new();
        let mut running = -JOIN_WIDTH;

        for option in options {
            let width = option.chars().count() as isize;
            let fits = limit.is_none_or(|limit| running + JOIN_WIDTH + width <= limit);
            if fits || current.is_empty() {
                if !current.is_empty() {
                    current.push_str(" | ");
                }
                current.push_str(option);
                running += JOIN_WIDTH + width;
            } else {
                fragments.push(std::mem::take(&mut current));
                current = format!("{OPTION_DELIMITER} {option}");
                running = 2 + width;
            }
        }
        if !current.is_empty() {
            fragments.push(current);
        }
        fragments
    }

}

pub use crate::classify::classify_line;
pub use crate::core::{OptionLinesConfig, OptionLinesError};
pub use crate::document::OptionLines;
pub use crate::format::{format_option_lines, wrap_options};
