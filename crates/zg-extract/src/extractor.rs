//! TermExtractor: one term record in, candidate lineage edges out.

use crate::overrides::PlaceholderMatcher;
use crate::routing::{contains_sql_keyword, route_attribute, value_text, AttributeRoute};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use zg_core::{
    is_write_admissible, Classified, Config, ExtractionFailure, FailureCategory, LineageEdge,
    TableDescriptor, TableRef, TermId, TermRecord, TermSection, Zone, ZoneClassifier,
};
use zg_sql::{SchemaContext, SqlStatementParser, TableExtraction};

/// Name used by flow engines for the in-flight record, never a real table
const FLOWFILE: &str = "flowfile";

fn datamart_table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:\$\{?[a-z0-9_]+\}?_)*(datamart_[a-z0-9_]+)\.([a-z0-9_]+)")
            .expect("valid regex")
    })
}

/// Edges and failures produced for one term.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Admissible edges, deduplicated, in discovery order
    pub edges: Vec<LineageEdge>,
    /// Failures, in discovery order
    pub failures: Vec<ExtractionFailure>,
}

impl Extraction {
    /// Whether neither edges nor failures were produced
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverrideKind {
    PreDelete,
    PostUpdate,
}

/// SQL attribute waiting to be parsed
#[derive(Debug)]
struct SqlAttribute {
    key: String,
    text: String,
    hint: Option<Zone>,
}

/// Raw table text with the zone suggested by its attribute
#[derive(Debug)]
struct TableHint {
    raw: String,
    hint: Option<Zone>,
}

/// Routed attributes of one section
#[derive(Debug, Default)]
struct SectionContext {
    sql: Vec<SqlAttribute>,
    hbase_sql: Vec<SqlAttribute>,
    explicit_sources: Vec<TableHint>,
    explicit_targets: Vec<TableHint>,
    hbase_targets: Vec<TableHint>,
    overrides: Vec<(OverrideKind, SqlAttribute)>,
    connection_zone: Option<Zone>,
    default_schema: Option<String>,
}

/// Candidates gathered from every section of a term
#[derive(Debug, Default)]
struct TermLanes {
    sources: Vec<Classified>,
    targets: Vec<Classified>,
    hbase_sources: Vec<Classified>,
    hbase_targets: Vec<Classified>,
    overrides: Vec<(OverrideKind, Vec<Classified>)>,
}

/// Per-term accumulator
struct TermState<'a> {
    term_id: &'a TermId,
    edges: Vec<LineageEdge>,
    seen: HashSet<(TableRef, TableRef)>,
    failures: Vec<ExtractionFailure>,
    has_target: bool,
    parse_failed: bool,
}

impl<'a> TermState<'a> {
    fn new(term_id: &'a TermId) -> Self {
        Self {
            term_id,
            edges: Vec::new(),
            seen: HashSet::new(),
            failures: Vec::new(),
            has_target: false,
            parse_failed: false,
        }
    }

    fn fail(&mut self, category: FailureCategory, message: String) {
        if category == FailureCategory::SqlParseFailure {
            self.parse_failed = true;
        }
        self.failures
            .push(ExtractionFailure::new(self.term_id.clone(), category, message));
    }
}

/// Extracts lineage edges from term records.
///
/// Extraction never fails: anything that prevents an edge is reported as an
/// [`ExtractionFailure`] next to whatever edges could be built.
pub struct TermExtractor {
    classifier: ZoneClassifier,
    parser: SqlStatementParser,
    matcher: PlaceholderMatcher,
    default_schema: Option<String>,
}

impl TermExtractor {
    /// Create an extractor from its collaborators
    pub fn new(
        classifier: ZoneClassifier,
        parser: SqlStatementParser,
        matcher: PlaceholderMatcher,
    ) -> Self {
        Self {
            classifier,
            parser,
            matcher,
            default_schema: None,
        }
    }

    /// Schema used for unqualified names when a section declares none
    pub fn with_default_schema(mut self, schema: Option<String>) -> Self {
        self.default_schema = schema;
        self
    }

    /// Build an extractor from the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ZoneClassifier::with_tokens(&config.zones.tokens),
            SqlStatementParser::from_config(&config.sql),
            PlaceholderMatcher::new(&config.placeholders),
        )
        .with_default_schema(config.sql.default_schema.clone())
    }

    /// Extract edges and failures from one term record.
    pub fn extract(&self, term: &TermRecord) -> Extraction {
        let mut state = TermState::new(&term.id);
        let mut lanes = TermLanes::default();

        for section in term.sections() {
            let ctx = self.route_section(&section);
            self.gather_section(ctx, &section, &mut lanes, &mut state);
        }

        self.apply_overrides(&lanes.overrides, &mut lanes.sources, &mut lanes.targets);
        if !lanes.targets.is_empty() || !lanes.hbase_targets.is_empty() {
            state.has_target = true;
        }
        self.pair_lane(&lanes.sources, &lanes.targets, &mut state);
        self.pair_lane(&lanes.hbase_sources, &lanes.hbase_targets, &mut state);

        if !state.has_target && !state.parse_failed {
            state.fail(
                FailureCategory::NoWriteTarget,
                format!("no write target declared in '{}'", term.display_name),
            );
        }

        log::debug!(
            "Term {}: {} edges, {} failures",
            term.id,
            state.edges.len(),
            state.failures.len()
        );
        Extraction {
            edges: state.edges,
            failures: state.failures,
        }
    }

    fn route_section(&self, section: &TermSection<'_>) -> SectionContext {
        let mut ctx = SectionContext::default();

        for (key, value) in &section.attributes {
            let text = value_text(value);
            let route = route_attribute(&self.classifier, key, &text);
            log::debug!("Attribute '{}' routed as {:?}", key, route);

            let sql = |hint| SqlAttribute {
                key: key.to_string(),
                text: text.clone(),
                hint,
            };
            match route {
                AttributeRoute::PreDelete => ctx.overrides.push((OverrideKind::PreDelete, sql(None))),
                AttributeRoute::PostUpdate => {
                    ctx.overrides.push((OverrideKind::PostUpdate, sql(None)))
                }
                AttributeRoute::Connection(zone) => {
                    if zone.is_some() {
                        ctx.connection_zone = zone;
                    }
                }
                AttributeRoute::Schema => {
                    ctx.default_schema = Some(text.trim().to_lowercase());
                }
                AttributeRoute::HBaseTarget => ctx.hbase_targets.push(TableHint {
                    raw: text.clone(),
                    hint: Some(Zone::Refinado),
                }),
                AttributeRoute::HBaseSql => ctx.hbase_sql.push(sql(None)),
                AttributeRoute::Sql { hint } => ctx.sql.push(sql(hint)),
                AttributeRoute::LandingFile => {
                    ctx.explicit_sources.push(TableHint {
                        raw: text.clone(),
                        hint: Some(Zone::Landing),
                    });
                    ctx.explicit_targets.push(TableHint {
                        raw: text.clone(),
                        hint: Some(Zone::Landing),
                    });
                }
                AttributeRoute::Targets { hint } => {
                    ctx.explicit_targets.push(TableHint { raw: text.clone(), hint })
                }
                AttributeRoute::Sources { hint } => {
                    ctx.explicit_sources.push(TableHint { raw: text.clone(), hint })
                }
                AttributeRoute::Ignored => {}
            }
        }
        ctx
    }

    fn schema_context(&self, ctx: &SectionContext) -> SchemaContext {
        SchemaContext {
            default_schema: ctx
                .default_schema
                .clone()
                .or_else(|| self.default_schema.clone()),
        }
    }

    fn candidate(&self, raw: &str, hint: Option<Zone>) -> Option<Classified> {
        let classified = self
            .classifier
            .classify(&TableDescriptor::with_hint(raw, hint));
        (!classified.name.is_empty()).then_some(classified)
    }

    /// Name inference first, then the attribute hint, then the connection.
    fn sql_candidate(
        &self,
        name: &str,
        hint: Option<Zone>,
        connection: Option<Zone>,
    ) -> Option<Classified> {
        let zone = self
            .classifier
            .infer_from_table_name(name)
            .or(hint)
            .or(connection);
        self.candidate(name, zone)
    }

    fn parse(
        &self,
        attr: &SqlAttribute,
        schema: &SchemaContext,
        state: &mut TermState<'_>,
    ) -> Option<TableExtraction> {
        let extraction = self.parser.extract_tables(&attr.text, schema);
        if let zg_sql::ParseOutcome::Failed { message } = &extraction.outcome {
            state.fail(
                FailureCategory::SqlParseFailure,
                format!("attribute '{}': {}", attr.key, message),
            );
            return None;
        }
        Some(extraction)
    }

    /// Table names listed in an explicit attribute (plain names or SQL).
    fn collect_tables(
        &self,
        item: &TableHint,
        schema: &SchemaContext,
        state: &mut TermState<'_>,
    ) -> Vec<String> {
        let mut names = Vec::new();
        for line in item.raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if contains_sql_keyword(line) {
                let attr = SqlAttribute {
                    key: "table list".to_string(),
                    text: line.to_string(),
                    hint: item.hint,
                };
                if let Some(extraction) = self.parse(&attr, schema, state) {
                    names.extend(extraction.reads);
                    names.extend(extraction.writes);
                }
                continue;
            }
            for piece in line.split([',', ';']) {
                let piece = piece.trim().replace(['`', '"'], "");
                let lowered = piece.to_lowercase();
                let without_alias = match lowered.find(" as ") {
                    Some(pos) => &lowered[..pos],
                    None => lowered.as_str(),
                };
                if let Some(name) = without_alias.split_whitespace().next() {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    fn override_tables(
        &self,
        kind: OverrideKind,
        attr: &SqlAttribute,
        schema: &SchemaContext,
    ) -> Vec<Classified> {
        let extraction = self.parser.extract_tables(&attr.text, schema);
        let primary = match kind {
            OverrideKind::PreDelete => extraction.deletes,
            OverrideKind::PostUpdate => extraction.writes,
        };
        let mut names: Vec<String> = if primary.is_empty() {
            extraction.reads.into_iter().collect()
        } else {
            primary.into_iter().collect()
        };
        if names.is_empty() {
            names = datamart_table_re()
                .find_iter(&attr.text)
                .map(|m| m.as_str().to_lowercase())
                .collect();
        }
        names
            .iter()
            .filter_map(|n| self.candidate(n, self.classifier.infer_from_table_name(n)))
            .collect()
    }

    fn apply_overrides(
        &self,
        overrides: &[(OverrideKind, Vec<Classified>)],
        sources: &mut [Classified],
        targets: &mut Vec<Classified>,
    ) {
        for (kind, tables) in overrides {
            for table in tables.iter().cloned() {
                let hit = sources
                    .iter_mut()
                    .chain(targets.iter_mut())
                    .filter(|c| c.zone == Some(Zone::Consumo))
                    .find(|c| self.matcher.tables_equal(&table.name, &c.name));

                match (hit, *kind) {
                    (Some(candidate), _) => {
                        log::debug!(
                            "Overriding {} ({:?}) with {} ({:?}) from {:?}",
                            candidate.name,
                            candidate.zone,
                            table.name,
                            table.zone,
                            kind
                        );
                        if table.zone.is_some() {
                            candidate.zone = table.zone;
                        }
                        candidate.name = table.name;
                    }
                    (None, OverrideKind::PostUpdate) => {
                        log::debug!("Adding post-update table {} as target", table.name);
                        targets.push(table);
                    }
                    (None, OverrideKind::PreDelete) => {
                        log::warn!(
                            "No candidate matches pre-delete table {} to override its zone",
                            table.name
                        );
                    }
                }
            }
        }
    }

    fn gather_section(
        &self,
        ctx: SectionContext,
        section: &TermSection<'_>,
        lanes: &mut TermLanes,
        state: &mut TermState<'_>,
    ) {
        let schema = self.schema_context(&ctx);
        let connection = ctx.connection_zone;

        let mut sources = Vec::new();
        let mut targets = Vec::new();
        for attr in &ctx.sql {
            let Some(extraction) = self.parse(attr, &schema, state) else {
                continue;
            };
            sources.extend(
                extraction
                    .reads
                    .iter()
                    .filter_map(|n| self.sql_candidate(n, attr.hint, connection)),
            );
            targets.extend(
                extraction
                    .writes
                    .iter()
                    .filter_map(|n| self.sql_candidate(n, attr.hint, connection)),
            );
        }

        let mut hbase_sources = Vec::new();
        for attr in &ctx.hbase_sql {
            if let Some(extraction) = self.parse(attr, &schema, state) {
                hbase_sources.extend(
                    extraction
                        .reads
                        .iter()
                        .filter_map(|n| self.sql_candidate(n, attr.hint, connection)),
                );
            }
        }
        let mut hbase_targets = Vec::new();
        for item in &ctx.hbase_targets {
            for name in self.collect_tables(item, &schema, state) {
                hbase_targets.extend(self.candidate(&name, item.hint));
            }
        }

        for item in &ctx.explicit_sources {
            for name in self.collect_tables(item, &schema, state) {
                sources.extend(self.candidate(&name, item.hint));
            }
        }
        for item in &ctx.explicit_targets {
            for name in self.collect_tables(item, &schema, state) {
                targets.extend(self.candidate(&name, item.hint));
            }
        }

        let overrides: Vec<_> = ctx
            .overrides
            .iter()
            .map(|(kind, attr)| (*kind, self.override_tables(*kind, attr, &schema)))
            .collect();

        log::debug!(
            "Section '{}': {} sources, {} targets, {} hbase sources, {} hbase targets",
            section.name,
            sources.len(),
            targets.len(),
            hbase_sources.len(),
            hbase_targets.len()
        );

        lanes.sources.extend(sources);
        lanes.targets.extend(targets);
        lanes.hbase_sources.extend(hbase_sources);
        lanes.hbase_targets.extend(hbase_targets);
        lanes.overrides.extend(overrides);
    }

    /// Every (distinct source, target) pair of one lane, across all sections.
    fn pair_lane(&self, sources: &[Classified], targets: &[Classified], state: &mut TermState<'_>) {
        let sources = dedup(sources);
        let targets = dedup(targets);

        for source in &sources {
            if source.name.eq_ignore_ascii_case(FLOWFILE) {
                log::warn!("Flowfile found as a source in term {}, skipping", state.term_id);
            }
        }

        for target in &targets {
            for source in &sources {
                if source.name.eq_ignore_ascii_case(FLOWFILE) || source == target {
                    continue;
                }
                let (Some(source_zone), Some(target_zone)) = (source.zone, target.zone) else {
                    state.fail(
                        FailureCategory::UnknownZone,
                        format!(
                            "{} ({}) -> {} ({})",
                            source.name,
                            zone_label(source.zone),
                            target.name,
                            zone_label(target.zone)
                        ),
                    );
                    continue;
                };
                if !is_write_admissible(source_zone, target_zone) {
                    log::debug!(
                        "Dropping {}.{} -> {}.{}: zone order",
                        source_zone,
                        source.name,
                        target_zone,
                        target.name
                    );
                    continue;
                }
                let (Some(from), Some(to)) = (source.to_table_ref(), target.to_table_ref()) else {
                    continue;
                };
                if state.seen.insert((from.clone(), to.clone())) {
                    state
                        .edges
                        .push(LineageEdge::new(from, to, state.term_id.clone()));
                }
            }
        }
    }
}

fn zone_label(zone: Option<Zone>) -> &'static str {
    zone.map_or("unknown", Zone::as_str)
}

fn dedup(candidates: &[Classified]) -> Vec<Classified> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|c| seen.insert((*c).clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
