//! Parser for Second Survey sector files: XML metadata plus tab-delimited
//! world data with a header row

use std::collections::HashMap;

use super::parser::{
    AllegianceRecord, BorderRecord, Cultural, Economic, LabelRecord, Pbg, RegionRecord,
    RouteRecord, SectorMetadata, SectorParser, SophontRecord, Uwp, WorldRecord,
};
use super::sector_xml::{
    parse_sector_document, LabelXml, ProductXml, RegionXml, RouteXml, SectorXml, SubsectorXml,
};
use crate::error::{Error, Result};
use crate::model::{AlternateName, Hex, Product, Star, SubsectorName};

const MAX_HEX_X: i32 = 32;
const MAX_HEX_Y: i32 = 40;

const LUMINOSITY_CLASSES: &[&str] = &["Ia", "Ib", "II", "III", "IV", "V", "VI", "VII", "D"];
const STELLAR_REMNANTS: &[&str] = &["D", "BD", "BH", "NS", "PSR"];

#[derive(Debug, Clone, Copy, Default)]
pub struct SecondSurveyParser;

impl SecondSurveyParser {
    pub fn new() -> Self {
        Self
    }
}

impl SectorParser for SecondSurveyParser {
    fn parse_metadata(&self, source: &str, text: &str) -> Result<SectorMetadata> {
        let doc = parse_sector_document(source, text)?;
        MetadataReader { source }.sector(doc)
    }

    fn parse_worlds(&self, source: &str, text: &str) -> Result<Vec<WorldRecord>> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'));

        let (_, header) = lines
            .next()
            .ok_or_else(|| Error::parse(source, "missing header row"))?;
        let columns: HashMap<&str, usize> = header
            .split('\t')
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();
        for required in ["Hex", "UWP"] {
            if !columns.contains_key(required) {
                return Err(Error::parse(
                    source,
                    format!("header has no '{}' column", required),
                ));
            }
        }

        let mut worlds = Vec::new();
        for (line_no, line) in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            let row = Row {
                fields: &fields,
                columns: &columns,
            };
            let world = parse_world(&row)
                .map_err(|message| Error::parse(format!("{} line {}", source, line_no), message))?;
            worlds.push(world);
        }

        Ok(worlds)
    }
}

struct Row<'a> {
    fields: &'a [&'a str],
    columns: &'a HashMap<&'a str, usize>,
}

impl<'a> Row<'a> {
    /// Trimmed field value; empty and `-` placeholders read as `None`
    fn get(&self, column: &str) -> Option<&'a str> {
        let index = *self.columns.get(column)?;
        let value = self.fields.get(index).copied()?.trim();
        match value {
            "" | "-" | "--" => None,
            value => Some(value),
        }
    }
}

type FieldResult<T> = std::result::Result<T, String>;

fn parse_world(row: &Row) -> FieldResult<WorldRecord> {
    let hex = parse_hex(row.get("Hex").ok_or("missing hex")?)?;
    let uwp = parse_uwp(row.get("UWP").ok_or("missing UWP")?)?;

    Ok(WorldRecord {
        hex,
        name: row.get("Name").map(str::to_string),
        uwp,
        remarks: row
            .get("Remarks")
            .map(|r| r.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
        importance: row.get("{Ix}").map(parse_importance).transpose()?,
        economic: row.get("(Ex)").map(parse_economic).transpose()?,
        cultural: row.get("[Cx]").map(parse_cultural).transpose()?,
        nobility: row.get("Nobility").map(str::to_string),
        bases: row.get("Bases").map(str::to_string),
        zone: row.get("Zone").map(str::to_string),
        pbg: row.get("PBG").map(parse_pbg).transpose()?,
        worlds: row
            .get("W")
            .map(|w| w.parse().map_err(|_| format!("invalid world count '{}'", w)))
            .transpose()?,
        allegiance: row.get("Allegiance").map(str::to_string),
        stars: row.get("Stars").map(parse_stars).transpose()?.unwrap_or_default(),
    })
}

fn parse_hex(value: &str) -> FieldResult<Hex> {
    let hex = Hex::parse(value).ok_or_else(|| format!("invalid hex '{}'", value))?;
    if !(1..=MAX_HEX_X).contains(&hex.x) || !(1..=MAX_HEX_Y).contains(&hex.y) {
        return Err(format!("hex '{}' is outside the sector", value));
    }
    Ok(hex)
}

fn is_ehex(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_uppercase() || c == '?'
}

fn parse_uwp(value: &str) -> FieldResult<Uwp> {
    let chars: Vec<char> = value.chars().collect();
    let valid = chars.len() == 9
        && chars[7] == '-'
        && chars
            .iter()
            .enumerate()
            .all(|(i, &c)| i == 7 || is_ehex(c));
    if !valid {
        return Err(format!("invalid UWP '{}'", value));
    }

    Ok(Uwp {
        starport: chars[0],
        size: chars[1],
        atmosphere: chars[2],
        hydrographics: chars[3],
        population: chars[4],
        government: chars[5],
        law_level: chars[6],
        tech_level: chars[8],
    })
}

fn strip_delimiters<'a>(value: &'a str, open: char, close: char, what: &str) -> FieldResult<&'a str> {
    value
        .strip_prefix(open)
        .and_then(|v| v.strip_suffix(close))
        .map(str::trim)
        .ok_or_else(|| format!("invalid {} '{}'", what, value))
}

fn parse_importance(value: &str) -> FieldResult<i32> {
    let inner = strip_delimiters(value, '{', '}', "importance")?;
    inner
        .parse()
        .map_err(|_| format!("invalid importance '{}'", value))
}

fn parse_economic(value: &str) -> FieldResult<Economic> {
    let inner = strip_delimiters(value, '(', ')', "economic extension")?;
    let chars: Vec<char> = inner.chars().collect();
    if chars.len() < 4 || !chars[..3].iter().all(|&c| is_ehex(c)) {
        return Err(format!("invalid economic extension '{}'", value));
    }
    let efficiency: String = chars[3..].iter().collect();
    let efficiency = efficiency
        .parse()
        .map_err(|_| format!("invalid economic extension '{}'", value))?;

    Ok(Economic {
        resources: chars[0],
        labor: chars[1],
        infrastructure: chars[2],
        efficiency,
    })
}

fn parse_cultural(value: &str) -> FieldResult<Cultural> {
    let inner = strip_delimiters(value, '[', ']', "cultural extension")?;
    let chars: Vec<char> = inner.chars().collect();
    if chars.len() != 4 || !chars.iter().all(|&c| is_ehex(c)) {
        return Err(format!("invalid cultural extension '{}'", value));
    }

    Ok(Cultural {
        heterogeneity: chars[0],
        acceptance: chars[1],
        strangeness: chars[2],
        symbols: chars[3],
    })
}

fn parse_pbg(value: &str) -> FieldResult<Pbg> {
    let digits: Vec<i32> = value
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as i32))
        .collect::<Option<_>>()
        .ok_or_else(|| format!("invalid PBG '{}'", value))?;
    match digits[..] {
        [population_multiplier, belts, gas_giants] => Ok(Pbg {
            population_multiplier,
            belts,
            gas_giants,
        }),
        _ => Err(format!("invalid PBG '{}'", value)),
    }
}

/// Parse a stellar description such as `G2 V M3 V D`
fn parse_stars(value: &str) -> FieldResult<Vec<Star>> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let mut stars = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        i += 1;

        let mut chars = token.chars();
        let spectral = match (chars.next(), chars.next(), chars.next()) {
            (Some(class @ ('O' | 'B' | 'A' | 'F' | 'G' | 'K' | 'M')), Some(digit), None) => {
                digit.to_digit(10).map(|d| (class, d as i32))
            }
            _ => None,
        };

        match spectral {
            Some((class, decimal)) => {
                let luminosity = tokens
                    .get(i)
                    .filter(|t| LUMINOSITY_CLASSES.contains(t))
                    .map(|t| t.to_string());
                if luminosity.is_some() {
                    i += 1;
                }
                stars.push(Star {
                    spectral_class: Some(class.to_string()),
                    spectral_decimal: Some(decimal),
                    luminosity_class: luminosity,
                });
            }
            None if STELLAR_REMNANTS.contains(&token) => stars.push(Star {
                spectral_class: Some(token.to_string()),
                spectral_decimal: None,
                luminosity_class: None,
            }),
            None => return Err(format!("invalid star '{}' in '{}'", token, value)),
        }
    }

    Ok(stars)
}

struct MetadataReader<'a> {
    source: &'a str,
}

impl<'a> MetadataReader<'a> {
    fn error(&self, message: String) -> Error {
        Error::parse(self.source, message)
    }

    fn sector(&self, doc: SectorXml) -> Result<SectorMetadata> {
        let product = |p: ProductXml, publication: Option<String>| Product {
            publication: owned(publication.as_deref()),
            author: owned(p.author.as_deref()),
            publisher: owned(p.publisher.as_deref()),
            reference: owned(p.reference.as_deref()),
        };

        let mut metadata = SectorMetadata {
            names: doc
                .names
                .into_iter()
                .filter_map(|n| {
                    owned(n.text.as_deref()).map(|name| AlternateName {
                        name,
                        language: owned(n.lang.as_deref()),
                    })
                })
                .collect(),
            abbreviation: owned(doc.abbreviation.as_deref()),
            label: owned(doc.label.as_deref()),
            tags: owned(doc.tags.as_deref()),
            selected: self.flag(doc.selected.as_deref())?,
            x: self.int(doc.x.as_deref(), "X")?,
            y: self.int(doc.y.as_deref(), "Y")?,
            credits: owned(doc.credits.as_deref()),
            style_sheet: owned(doc.style_sheet.as_deref()),
            data_file: doc.data_file.map(|d| {
                let source = d.source.clone();
                product(d, source)
            }),
            products: doc
                .products
                .into_iter()
                .map(|p| {
                    let title = p.title.clone();
                    product(p, title)
                })
                .collect(),
            ..SectorMetadata::default()
        };

        for subsector in doc.subsectors.unwrap_or_default().items {
            metadata.subsectors.push(self.subsector(subsector)?);
        }

        metadata.allegiances = doc
            .allegiances
            .unwrap_or_default()
            .items
            .into_iter()
            .filter_map(|a| {
                let code = owned(a.code.as_deref())?;
                Some(AllegianceRecord {
                    name: owned(a.text.as_deref()).unwrap_or_else(|| code.clone()),
                    code,
                    legacy: owned(a.legacy.as_deref()),
                    base: owned(a.base.as_deref()),
                })
            })
            .collect();

        for sophont in doc.sophonts.unwrap_or_default().items {
            let Some(code) = owned(sophont.code.as_deref()) else {
                continue;
            };
            metadata.sophonts.push(SophontRecord {
                name: owned(sophont.text.as_deref()).unwrap_or_else(|| code.clone()),
                code,
                is_major: self.flag(sophont.major.as_deref())?,
            });
        }

        for route in doc.routes.unwrap_or_default().items {
            metadata.routes.push(self.route(route)?);
        }
        for border in doc.borders.unwrap_or_default().items {
            metadata.borders.push(BorderRecord {
                allegiance: owned(border.allegiance.as_deref()),
                style: owned(border.style.as_deref()),
                region: self.region(&border)?,
            });
        }
        for region in doc.regions.unwrap_or_default().items {
            metadata.regions.push(self.region(&region)?);
        }
        for label in doc.labels.unwrap_or_default().items {
            metadata.labels.push(self.label(label)?);
        }

        Ok(metadata)
    }

    fn subsector(&self, element: SubsectorXml) -> Result<SubsectorName> {
        let index = element.index.unwrap_or_default();
        let code = match index.trim().as_bytes() {
            [letter @ b'A'..=b'P'] => letter - b'A',
            _ => return Err(self.error(format!("invalid subsector index '{}'", index))),
        };
        Ok(SubsectorName {
            code,
            name: owned(element.text.as_deref()).unwrap_or_default(),
        })
    }

    fn route(&self, element: RouteXml) -> Result<RouteRecord> {
        let offset = |value: &Option<String>, what: &str| -> Result<i32> {
            Ok(self.int(value.as_deref(), what)?.unwrap_or(0))
        };
        Ok(RouteRecord {
            start: self.hex(element.start.as_deref(), "route start")?,
            end: self.hex(element.end.as_deref(), "route end")?,
            start_offset: (
                offset(&element.start_offset_x, "StartOffsetX")?,
                offset(&element.start_offset_y, "StartOffsetY")?,
            ),
            end_offset: (
                offset(&element.end_offset_x, "EndOffsetX")?,
                offset(&element.end_offset_y, "EndOffsetY")?,
            ),
            width: self.float(element.width.as_deref(), "Width")?,
            route_type: owned(element.route_type.as_deref()),
            style: owned(element.style.as_deref()),
            color: owned(element.color.as_deref()),
            allegiance: owned(element.allegiance.as_deref()),
        })
    }

    /// Shared shape of borders and regions: a hex path as element text
    fn region(&self, element: &RegionXml) -> Result<RegionRecord> {
        let hexes = element
            .path
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(|h| Hex::parse(h).ok_or_else(|| self.error(format!("invalid path hex '{}'", h))))
            .collect::<Result<Vec<_>>>()?;

        Ok(RegionRecord {
            hexes,
            show_label: match element.show_label.as_deref() {
                Some(value) => self.flag(Some(value))?,
                None => true,
            },
            wrap_label: self.flag(element.wrap_label.as_deref())?,
            label_position: element
                .label_position
                .as_deref()
                .map(|h| self.hex(Some(h), "label position"))
                .transpose()?,
            label_offset_x: self.float(element.label_offset_x.as_deref(), "LabelOffsetX")?,
            label_offset_y: self.float(element.label_offset_y.as_deref(), "LabelOffsetY")?,
            label: owned(element.label.as_deref()),
            color: owned(element.color.as_deref()),
        })
    }

    fn label(&self, element: LabelXml) -> Result<LabelRecord> {
        Ok(LabelRecord {
            hex: self.hex(element.hex.as_deref(), "label hex")?,
            text: owned(element.text.as_deref()).unwrap_or_default(),
            color: owned(element.color.as_deref()),
            size: owned(element.size.as_deref()),
            wrap: self.flag(element.wrap.as_deref())?,
            offset_x: self.float(element.offset_x.as_deref(), "OffsetX")?,
            offset_y: self.float(element.offset_y.as_deref(), "OffsetY")?,
        })
    }

    fn hex(&self, value: Option<&str>, what: &str) -> Result<Hex> {
        let value = value.unwrap_or_default();
        Hex::parse(value).ok_or_else(|| self.error(format!("invalid {} '{}'", what, value)))
    }

    fn int(&self, value: Option<&str>, what: &str) -> Result<Option<i32>> {
        value
            .map(|v| {
                v.trim()
                    .parse()
                    .map_err(|_| self.error(format!("invalid {} '{}'", what, v)))
            })
            .transpose()
    }

    fn float(&self, value: Option<&str>, what: &str) -> Result<Option<f64>> {
        value
            .map(|v| {
                v.trim()
                    .parse()
                    .map_err(|_| self.error(format!("invalid {} '{}'", what, v)))
            })
            .transpose()
    }

    fn flag(&self, value: Option<&str>) -> Result<bool> {
        match value.map(str::trim) {
            None => Ok(false),
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
            Some(v) => Err(self.error(format!("invalid boolean '{}'", v))),
        }
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
