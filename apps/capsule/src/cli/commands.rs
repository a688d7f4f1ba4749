//! # CLI Commands
//!
//! One function per subcommand. Each takes a loaded [`Catalog`] and writes
//! either a human-readable report or, in JSON mode, one pretty-printed JSON
//! document to `out`.

use capsule_core::deeplink;
use capsule_core::{
    Backlink, Capsule, Catalog, CapsuleError, CapsuleKind, NormalizedCapsule, Relation, normalize,
    route_path,
};
use serde::Serialize;
use std::fmt::Display;
use std::io::Write;

// =============================================================================
// HELPERS
// =============================================================================

fn io_error(e: std::io::Error) -> CapsuleError {
    CapsuleError::IoError(e.to_string())
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), CapsuleError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CapsuleError::SerializationError(e.to_string()))?;
    writeln!(out, "{}", text).map_err(io_error)
}

fn find<'c>(catalog: &'c Catalog, slug: &str) -> Result<&'c Capsule, CapsuleError> {
    catalog
        .get(slug)
        .ok_or_else(|| CapsuleError::NotFound(slug.to_owned()))
}

/// Write `label: value` when the value is present.
fn field(out: &mut impl Write, label: &str, value: Option<impl Display>) -> Result<(), CapsuleError> {
    match value {
        Some(v) => writeln!(out, "{:<15} {}", format!("{}:", label), v).map_err(io_error),
        None => Ok(()),
    }
}

/// Write `label: a, b, c` when the list is non-empty.
fn list_field<T: AsRef<str>>(out: &mut impl Write, label: &str, values: &[T]) -> Result<(), CapsuleError> {
    if values.is_empty() {
        return Ok(());
    }
    let joined = values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
    field(out, label, Some(joined))
}

fn slugs<'c>(capsules: &[&'c Capsule]) -> Vec<&'c str> {
    capsules.iter().map(|c| c.slug.as_str()).collect()
}

/// Listing row shared by `list` and `graph`.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    slug: &'a str,
    kind: CapsuleKind,
    title: &'a str,
    route: String,
}

impl<'a> Summary<'a> {
    fn of(capsule: &'a Capsule) -> Self {
        Self {
            slug: &capsule.slug,
            kind: capsule.kind,
            title: normalize::title(capsule),
            route: route_path(capsule.kind, &capsule.slug),
        }
    }
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List capsules, all kinds or one.
pub fn cmd_list(
    catalog: &Catalog,
    kind: Option<CapsuleKind>,
    json_mode: bool,
    out: &mut impl Write,
) -> Result<(), CapsuleError> {
    let capsules: Vec<&Capsule> = match kind {
        Some(kind) => catalog.registry().all_of_kind(kind).collect(),
        None => catalog.all().iter().collect(),
    };

    if json_mode {
        let rows: Vec<Summary<'_>> = capsules.iter().map(|c| Summary::of(c)).collect();
        return write_json(out, &rows);
    }

    writeln!(out, "Capsules ({})", capsules.len()).map_err(io_error)?;
    writeln!(out, "============").map_err(io_error)?;
    for capsule in capsules {
        writeln!(
            out,
            "{:<8} {:<32} {}",
            capsule.kind.as_str(),
            capsule.slug,
            normalize::title(capsule)
        )
        .map_err(io_error)?;
    }

    Ok(())
}

// =============================================================================
// ROUTES COMMAND
// =============================================================================

/// Print every capsule's route, one per line.
pub fn cmd_routes(catalog: &Catalog, json_mode: bool, out: &mut impl Write) -> Result<(), CapsuleError> {
    let routes = catalog.routes();

    if json_mode {
        return write_json(out, &routes);
    }

    for route in routes {
        writeln!(out, "{}", route).map_err(io_error)?;
    }
    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

#[derive(Serialize)]
struct ShowOutput<'a> {
    route: String,
    #[serde(flatten)]
    capsule: NormalizedCapsule<'a>,
}

/// Print the normalized view of one capsule.
pub fn cmd_show(
    catalog: &Catalog,
    slug: &str,
    json_mode: bool,
    out: &mut impl Write,
) -> Result<(), CapsuleError> {
    let capsule = find(catalog, slug)?;
    let view = NormalizedCapsule::of(capsule);
    let route = route_path(capsule.kind, &capsule.slug);

    if json_mode {
        return write_json(out, &ShowOutput { route, capsule: view });
    }

    writeln!(out, "{}", view.title).map_err(io_error)?;
    writeln!(out, "{}", "=".repeat(view.title.chars().count().max(3))).map_err(io_error)?;
    field(out, "Kind", Some(view.kind))?;
    field(out, "Slug", Some(view.slug))?;
    field(out, "Id", Some(&view.id))?;
    field(out, "Lang", Some(view.lang))?;
    field(out, "Route", Some(&route))?;
    field(out, "Emoji", view.emoji)?;
    field(out, "Region", view.region)?;
    field(out, "Duration", view.duration)?;
    field(
        out,
        "Price from",
        view.price
            .map(|p| format!("{} {}", p, view.price_currency.unwrap_or_default()).trim_end().to_owned()),
    )?;
    field(out, "Difficulty", view.difficulty.map(|d| d.as_str()))?;
    let seasons: Vec<&str> = view.seasons.iter().map(|s| s.as_str()).collect();
    list_field(out, "Seasons", &seasons)?;
    list_field(out, "Tags", view.tags)?;
    list_field(out, "Highlights", view.highlights)?;
    list_field(out, "Includes", view.includes)?;
    list_field(out, "Excludes", view.excludes)?;
    field(out, "Group size", view.max_group_size)?;
    field(out, "Meeting point", view.meeting_point)?;
    field(
        out,
        "Coordinates",
        view.coordinates.map(|(lat, lng)| format!("{}, {}", lat, lng)),
    )?;
    field(out, "Altitude", view.altitude.map(|a| format!("{} m", a)))?;
    field(out, "Best time", view.best_time)?;
    field(out, "Visit", view.visit_duration)?;

    if !view.surface.is_empty() {
        writeln!(out).map_err(io_error)?;
        writeln!(out, "{}", view.surface).map_err(io_error)?;
    }
    if !view.body.is_empty() && view.body != view.surface {
        writeln!(out).map_err(io_error)?;
        writeln!(out, "{}", view.body).map_err(io_error)?;
    }

    Ok(())
}

// =============================================================================
// GRAPH COMMAND
// =============================================================================

#[derive(Serialize)]
struct BacklinkRow<'a> {
    source: &'a str,
    rel: &'a Relation,
}

impl<'a> From<Backlink<'a>> for BacklinkRow<'a> {
    fn from(backlink: Backlink<'a>) -> Self {
        Self {
            source: &backlink.source.slug,
            rel: backlink.rel,
        }
    }
}

#[derive(Serialize)]
struct GraphOutput<'a> {
    slug: &'a str,
    children: Vec<&'a str>,
    parent: Option<&'a str>,
    neighbors: Vec<&'a str>,
    related: Vec<&'a str>,
    recommendations: Vec<&'a str>,
    contained_in: Vec<&'a str>,
    backlinks: Vec<BacklinkRow<'a>>,
}

/// Print the link neighborhood of one capsule.
pub fn cmd_graph(
    catalog: &Catalog,
    slug: &str,
    json_mode: bool,
    out: &mut impl Write,
) -> Result<(), CapsuleError> {
    let capsule = find(catalog, slug)?;
    let resolver = catalog.resolver();

    let graph = GraphOutput {
        slug: &capsule.slug,
        children: slugs(&resolver.children_of(capsule)),
        parent: resolver.parent_of(capsule).map(|c| c.slug.as_str()),
        neighbors: slugs(&resolver.neighbors_of(capsule)),
        related: slugs(&resolver.related_of(capsule)),
        recommendations: slugs(&resolver.recommendations_of(capsule)),
        contained_in: slugs(&resolver.linked_by(&capsule.slug, &Relation::Contains)),
        backlinks: resolver
            .backlinks_of(&capsule.slug)
            .into_iter()
            .map(BacklinkRow::from)
            .collect(),
    };

    if json_mode {
        return write_json(out, &graph);
    }

    writeln!(out, "Links of {}", Summary::of(capsule).route).map_err(io_error)?;
    field(out, "Parent", graph.parent)?;
    list_field(out, "Children", &graph.children)?;
    list_field(out, "Neighbors", &graph.neighbors)?;
    list_field(out, "Related", &graph.related)?;
    list_field(out, "Recommends", &graph.recommendations)?;
    list_field(out, "Contained in", &graph.contained_in)?;

    if !graph.backlinks.is_empty() {
        writeln!(out, "Linked from:").map_err(io_error)?;
        for backlink in &graph.backlinks {
            writeln!(out, "  {} ({})", backlink.source, backlink.rel).map_err(io_error)?;
        }
    }

    Ok(())
}

// =============================================================================
// RENDER COMMAND
// =============================================================================

/// Print a capsule body with `[[slug]]` references rewritten.
pub fn cmd_render(
    catalog: &Catalog,
    slug: &str,
    json_mode: bool,
    out: &mut impl Write,
) -> Result<(), CapsuleError> {
    let capsule = find(catalog, slug)?;
    let rewrite = deeplink::rewrite(catalog.registry(), normalize::body(capsule));

    if json_mode {
        let output = serde_json::json!({
            "slug": capsule.slug,
            "route": route_path(capsule.kind, &capsule.slug),
            "body": rewrite.text,
            "unresolved": rewrite.unresolved,
        });
        return write_json(out, &output);
    }

    writeln!(out, "{}", rewrite.text).map_err(io_error)
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Audit the catalog for dangling links and unresolved deep links.
///
/// Returns `CapsuleError::CheckFailed` when any issue is found, after the
/// report has been written.
pub fn cmd_check(catalog: &Catalog, json_mode: bool, out: &mut impl Write) -> Result<(), CapsuleError> {
    let dangling = catalog.dangling_links();
    let unresolved = catalog.unresolved_references();
    let issues = dangling.len() + unresolved.len();

    tracing::info!(
        capsules = catalog.all().len(),
        dangling = dangling.len(),
        unresolved = unresolved.len(),
        "catalog checked"
    );

    if json_mode {
        let output = serde_json::json!({
            "capsules": catalog.all().len(),
            "tours": catalog.list_tours().len(),
            "places": catalog.list_places().len(),
            "guides": catalog.list_guides().len(),
            "dangling_links": dangling,
            "unresolved_references": unresolved,
            "ok": issues == 0,
        });
        write_json(out, &output)?;
    } else {
        writeln!(out, "Capsule Catalog Check").map_err(io_error)?;
        writeln!(out, "=====================").map_err(io_error)?;
        writeln!(out, "Capsules:   {}", catalog.all().len()).map_err(io_error)?;
        writeln!(out, "Tours:      {}", catalog.list_tours().len()).map_err(io_error)?;
        writeln!(out, "Places:     {}", catalog.list_places().len()).map_err(io_error)?;
        writeln!(out, "Guides:     {}", catalog.list_guides().len()).map_err(io_error)?;
        writeln!(out).map_err(io_error)?;

        for link in &dangling {
            writeln!(
                out,
                "dangling   {} --{}--> {}",
                link.source,
                link.rel,
                link.target.as_deref().unwrap_or("<none>")
            )
            .map_err(io_error)?;
        }
        for reference in &unresolved {
            writeln!(out, "unresolved {} [[{}]]", reference.source, reference.token)
                .map_err(io_error)?;
        }

        if issues == 0 {
            writeln!(out, "OK").map_err(io_error)?;
        } else {
            writeln!(out, "{} issue(s) found", issues).map_err(io_error)?;
        }
    }

    if issues == 0 {
        Ok(())
    } else {
        Err(CapsuleError::CheckFailed(issues))
    }
}
