//! Read-only reports over a persisted graph.

use std::io::{self, Write};

use crate::store::query::{Query, QueryParseError, Solution};
use crate::store::TripleStore;

/// Projects with their description and, when present, the parts they use.
pub const PROJECT_MAP_QUERY: &str = r#"
PREFIX doap: <http://usefulinc.com/ns/doap#>
PREFIX rdfs: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX xkos: <http://rdf-vocabulary.ddialliance.org/xkos#>
SELECT *
WHERE {
  ?project rdfs:type doap:Project .
  ?project doap:description ?description .
  ?project doap:name ?name .
  OPTIONAL {
    ?project xkos:hasPart ?part .
    ?part doap:name ?partName
  }
}
"#;

/// Products, the projects they include and the technologies those use.
pub const PRODUCT_OVERVIEW_QUERY: &str = r#"
PREFIX doap: <http://usefulinc.com/ns/doap#>
PREFIX rdfs: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX xkos: <http://rdf-vocabulary.ddialliance.org/xkos#>
PREFIX so: <http://schema.org/version/3.1/>
SELECT *
WHERE {
  ?product rdfs:type so:SoftwareApplication .
  ?product so:name ?productName .
  OPTIONAL {
    ?product xkos:hasPart ?project .
    ?project rdfs:type doap:Project .
    ?project doap:description ?description .
    ?project doap:name ?projectName .
    OPTIONAL {
      ?project xkos:hasPart ?technology .
      ?technology doap:name ?technologyName .
    }
  }
}
ORDER BY ?project
"#;

/// Run `text` against `store`.
pub fn run_query(store: &TripleStore, text: &str) -> Result<Vec<Solution>, QueryParseError> {
    Ok(store.query(&Query::parse(text)?))
}

fn value<'a>(row: &'a Solution, var: &str) -> &'a str {
    row.value(var).unwrap_or_default()
}

/// Markdown listing, one section per solution row.
pub fn render_project_map<W: Write>(rows: &[Solution], out: &mut W) -> io::Result<()> {
    for row in rows {
        writeln!(out, "## [{}]({})", value(row, "name"), value(row, "project"))?;
        writeln!(out)?;
        writeln!(out, "{}", value(row, "description"))?;

        if row.is_bound("part") {
            writeln!(out, "\nThis project is also using:")?;
            writeln!(out, " * [{}]({})", value(row, "partName"), value(row, "part"))?;
            writeln!(out)?;
        }

        writeln!(out)?;
    }
    Ok(())
}

/// One line per row: product, then the project and technology when bound.
pub fn render_product_overview<W: Write>(rows: &[Solution], out: &mut W) -> io::Result<()> {
    for row in rows {
        write!(out, "{}", value(row, "productName"))?;
        if let Some(project) = row.value("projectName").filter(|v| !v.is_empty()) {
            write!(out, " includes {project}")?;
        }
        if let Some(technology) = row.value("technologyName").filter(|v| !v.is_empty()) {
            write!(out, " which uses {technology}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
