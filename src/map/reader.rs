//! XML map document reader.
//!
//! The document layout follows the exported orienteering-map interchange
//! form: a `<map>` root with an optional `<georeferencing>` block and one
//! `<layer>` element per drawing layer, each holding `<object>` elements.
//! Object coordinates are semicolon-separated `x y flags` triples in
//! map-internal units; the flag word carries curve/hole/gap/dash bits
//! (see [`crate::map::feature`]).
//!
//! ```xml
//! <map scale="10000">
//!   <georeferencing scale="10000">
//!     <ref_point x="0" y="0"/>
//!     <ref_point_deg lat="61.45" lon="23.85"/>
//!   </georeferencing>
//!   <layer name="barrier">
//!     <object symbol="201" type="area">
//!       <coords>0 0 0;800 0 0;800 600 0;0 600 0</coords>
//!     </object>
//!   </layer>
//! </map>
//! ```

use std::path::Path;

use glam::DVec2;
use tracing::debug;

use crate::map::feature::{Coord, CoordFlags, Feature, FeatureKind};
use crate::types::{MapBounds, MapLoadError, PlannerError};

/// Georeferencing block of a map document, when present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoReference {
    /// Reference latitude/longitude in degrees.
    pub ref_lat: f64,
    pub ref_lon: f64,
    /// Internal-unit anchor matching the reference point.
    pub anchor: DVec2,
    /// Map scale denominator, e.g. 10000 for 1:10000.
    pub scale: f64,
}

/// Result of reading a map document.
#[derive(Debug, Clone)]
pub struct MapDocument {
    /// Features from the requested layers, in document order.
    pub features: Vec<Feature>,
    /// Georeferencing, if the document carries it.
    pub georef: Option<GeoReference>,
    /// Bounding rectangle over all feature coordinates, internal units.
    pub bounds: MapBounds,
}

impl MapDocument {
    /// Map scale denominator; falls back to 1:10000 when ungeoreferenced.
    pub fn scale(&self) -> f64 {
        self.georef.map(|g| g.scale).unwrap_or(10_000.0)
    }
}

/// Read and parse a map document, keeping features from `layers` only.
pub fn read_map(path: impl AsRef<Path>, layers: &[String]) -> Result<MapDocument, PlannerError> {
    let text = std::fs::read_to_string(path.as_ref()).map_err(MapLoadError::from)?;
    parse_map(&text, layers)
}

/// Parse a map document from an XML string.
pub fn parse_map(xml: &str, layers: &[String]) -> Result<MapDocument, PlannerError> {
    let doc = roxmltree::Document::parse(xml).map_err(MapLoadError::from)?;
    let root = doc.root_element();
    if root.tag_name().name() != "map" {
        return Err(structure("root element is not <map>"));
    }

    let georef = root
        .children()
        .find(|n| n.has_tag_name("georeferencing"))
        .map(parse_georef)
        .transpose()?;

    let mut features = Vec::new();
    let mut bounds = MapBounds::empty();

    for layer in root.children().filter(|n| n.has_tag_name("layer")) {
        let Some(name) = layer.attribute("name") else {
            return Err(structure("<layer> missing name attribute"));
        };
        if !layers.iter().any(|l| l == name) {
            continue;
        }
        for object in layer.children().filter(|n| n.has_tag_name("object")) {
            let feature = parse_object(object, name)?;
            for c in &feature.coords {
                bounds.expand_to_include(c.pos);
            }
            features.push(feature);
        }
    }

    debug!(
        features = features.len(),
        georeferenced = georef.is_some(),
        "map document parsed"
    );

    Ok(MapDocument {
        features,
        georef,
        bounds,
    })
}

fn parse_georef(node: roxmltree::Node) -> Result<GeoReference, PlannerError> {
    let scale = attr_f64(node, "scale")?;
    let anchor = node
        .children()
        .find(|n| n.has_tag_name("ref_point"))
        .map(|n| Ok::<_, PlannerError>(DVec2::new(attr_f64(n, "x")?, attr_f64(n, "y")?)))
        .transpose()?
        .unwrap_or(DVec2::ZERO);
    let deg = node
        .children()
        .find(|n| n.has_tag_name("ref_point_deg"))
        .ok_or_else(|| structure("<georeferencing> missing <ref_point_deg>"))?;
    Ok(GeoReference {
        ref_lat: attr_f64(deg, "lat")?,
        ref_lon: attr_f64(deg, "lon")?,
        anchor,
        scale,
    })
}

fn parse_object(node: roxmltree::Node, layer: &str) -> Result<Feature, PlannerError> {
    let symbol_code = node
        .attribute("symbol")
        .ok_or_else(|| structure("<object> missing symbol attribute"))?
        .to_string();
    let kind = match node.attribute("type") {
        Some("point") => FeatureKind::Point,
        Some("line") => FeatureKind::Line,
        Some("area") => FeatureKind::Area,
        Some(other) => {
            return Err(structure(format!("unknown object type {other:?}")));
        }
        None => FeatureKind::Line,
    };
    let coords_text = node
        .children()
        .find(|n| n.has_tag_name("coords"))
        .and_then(|n| n.text())
        .ok_or_else(|| structure("<object> missing <coords>"))?;
    let coords = parse_coords(coords_text)?;
    if coords.is_empty() {
        return Err(structure("<coords> is empty"));
    }
    Ok(Feature {
        symbol_code,
        layer: layer.to_string(),
        kind,
        coords,
    })
}

fn parse_coords(text: &str) -> Result<Vec<Coord>, PlannerError> {
    let mut coords = Vec::new();
    for entry in text.split(';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let mut parts = entry.split_whitespace();
        let x = parse_num(parts.next(), entry)?;
        let y = parse_num(parts.next(), entry)?;
        let flags = match parts.next() {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| structure(format!("bad coordinate flags in {entry:?}")))?,
            None => 0,
        };
        coords.push(Coord {
            pos: DVec2::new(x, y),
            flags: CoordFlags::from_bits(flags),
        });
    }
    Ok(coords)
}

fn parse_num(raw: Option<&str>, entry: &str) -> Result<f64, PlannerError> {
    raw.and_then(|r| r.parse::<f64>().ok())
        .ok_or_else(|| structure(format!("bad coordinate {entry:?}")))
}

fn attr_f64(node: roxmltree::Node, name: &str) -> Result<f64, PlannerError> {
    node.attribute(name)
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| {
            structure(format!(
                "<{}> missing numeric {name} attribute",
                node.tag_name().name()
            ))
        })
}

fn structure(message: impl Into<String>) -> PlannerError {
    PlannerError::MapLoad(MapLoadError::Structure(message.into()))
}
