//! Serde shapes of the sector metadata document
//!
//! Attributes are `@`-prefixed fields and element text is `$text`, as
//! `quick_xml::de` expects. Values stay strings here; `MetadataReader`
//! validates and converts them.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SectorXml {
    #[serde(rename = "@Abbreviation")]
    pub abbreviation: Option<String>,
    #[serde(rename = "@Label")]
    pub label: Option<String>,
    #[serde(rename = "@Tags")]
    pub tags: Option<String>,
    #[serde(rename = "@Selected")]
    pub selected: Option<String>,

    #[serde(rename = "Name")]
    pub names: Vec<NameXml>,
    #[serde(rename = "X")]
    pub x: Option<String>,
    #[serde(rename = "Y")]
    pub y: Option<String>,
    #[serde(rename = "Credits")]
    pub credits: Option<String>,
    #[serde(rename = "Stylesheet")]
    pub style_sheet: Option<String>,
    #[serde(rename = "DataFile")]
    pub data_file: Option<ProductXml>,
    #[serde(rename = "Product")]
    pub products: Vec<ProductXml>,

    #[serde(rename = "Subsectors")]
    pub subsectors: Option<SubsectorsXml>,
    #[serde(rename = "Allegiances")]
    pub allegiances: Option<AllegiancesXml>,
    #[serde(rename = "Sophonts")]
    pub sophonts: Option<SophontsXml>,
    #[serde(rename = "Routes")]
    pub routes: Option<RoutesXml>,
    #[serde(rename = "Borders")]
    pub borders: Option<BordersXml>,
    #[serde(rename = "Regions")]
    pub regions: Option<RegionsXml>,
    #[serde(rename = "Labels")]
    pub labels: Option<LabelsXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct NameXml {
    #[serde(rename = "@Lang")]
    pub lang: Option<String>,
    #[serde(rename = "$text")]
    pub text: Option<String>,
}

/// `<DataFile>` and `<Product>` share their attributes apart from the title
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ProductXml {
    #[serde(rename = "@Source")]
    pub source: Option<String>,
    #[serde(rename = "@Title")]
    pub title: Option<String>,
    #[serde(rename = "@Author")]
    pub author: Option<String>,
    #[serde(rename = "@Publisher")]
    pub publisher: Option<String>,
    #[serde(rename = "@Ref")]
    pub reference: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SubsectorsXml {
    #[serde(rename = "Subsector")]
    pub items: Vec<SubsectorXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SubsectorXml {
    #[serde(rename = "@Index")]
    pub index: Option<String>,
    #[serde(rename = "$text")]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AllegiancesXml {
    #[serde(rename = "Allegiance")]
    pub items: Vec<AllegianceXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AllegianceXml {
    #[serde(rename = "@Code")]
    pub code: Option<String>,
    #[serde(rename = "@Legacy")]
    pub legacy: Option<String>,
    #[serde(rename = "@Base")]
    pub base: Option<String>,
    #[serde(rename = "$text")]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SophontsXml {
    #[serde(rename = "Sophont")]
    pub items: Vec<SophontXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SophontXml {
    #[serde(rename = "@Code")]
    pub code: Option<String>,
    #[serde(rename = "@Major")]
    pub major: Option<String>,
    #[serde(rename = "$text")]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RoutesXml {
    #[serde(rename = "Route")]
    pub items: Vec<RouteXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RouteXml {
    #[serde(rename = "@Start")]
    pub start: Option<String>,
    #[serde(rename = "@End")]
    pub end: Option<String>,
    #[serde(rename = "@StartOffsetX")]
    pub start_offset_x: Option<String>,
    #[serde(rename = "@StartOffsetY")]
    pub start_offset_y: Option<String>,
    #[serde(rename = "@EndOffsetX")]
    pub end_offset_x: Option<String>,
    #[serde(rename = "@EndOffsetY")]
    pub end_offset_y: Option<String>,
    #[serde(rename = "@Type")]
    pub route_type: Option<String>,
    #[serde(rename = "@Style")]
    pub style: Option<String>,
    #[serde(rename = "@Color")]
    pub color: Option<String>,
    #[serde(rename = "@Width")]
    pub width: Option<String>,
    #[serde(rename = "@Allegiance")]
    pub allegiance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BordersXml {
    #[serde(rename = "Border")]
    pub items: Vec<RegionXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RegionsXml {
    #[serde(rename = "Region")]
    pub items: Vec<RegionXml>,
}

/// A `<Border>` or `<Region>`: label attributes plus a hex path as text.
/// `Allegiance` and `Style` only appear on borders.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RegionXml {
    #[serde(rename = "@Allegiance")]
    pub allegiance: Option<String>,
    #[serde(rename = "@Style")]
    pub style: Option<String>,
    #[serde(rename = "@ShowLabel")]
    pub show_label: Option<String>,
    #[serde(rename = "@WrapLabel")]
    pub wrap_label: Option<String>,
    #[serde(rename = "@LabelPosition")]
    pub label_position: Option<String>,
    #[serde(rename = "@LabelOffsetX")]
    pub label_offset_x: Option<String>,
    #[serde(rename = "@LabelOffsetY")]
    pub label_offset_y: Option<String>,
    #[serde(rename = "@Label")]
    pub label: Option<String>,
    #[serde(rename = "@Color")]
    pub color: Option<String>,
    #[serde(rename = "$text")]
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LabelsXml {
    #[serde(rename = "Label")]
    pub items: Vec<LabelXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LabelXml {
    #[serde(rename = "@Hex")]
    pub hex: Option<String>,
    #[serde(rename = "@Color")]
    pub color: Option<String>,
    #[serde(rename = "@Size")]
    pub size: Option<String>,
    #[serde(rename = "@Wrap")]
    pub wrap: Option<String>,
    #[serde(rename = "@OffsetX")]
    pub offset_x: Option<String>,
    #[serde(rename = "@OffsetY")]
    pub offset_y: Option<String>,
    #[serde(rename = "$text")]
    pub text: Option<String>,
}

/// Parse a `<Sector>` metadata document
pub(crate) fn parse_sector_document(source: &str, text: &str) -> Result<SectorXml> {
    let root = root_element_name(source, text)?;
    if root != "Sector" {
        return Err(Error::parse(
            source,
            format!("root element is <{}>, expected <Sector>", root),
        ));
    }
    quick_xml::de::from_str(text).map_err(|e| Error::parse(source, e.to_string()))
}

/// Name of the first element; the deserializer does not check it
fn root_element_name(source: &str, text: &str) -> Result<String> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                return Ok(String::from_utf8_lossy(element.name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => return Err(Error::parse(source, "document has no root element")),
            Ok(_) => {}
            Err(err) => {
                return Err(Error::parse(
                    source,
                    format!("xml error at byte {}: {}", reader.buffer_position(), err),
                ))
            }
        }
    }
}
