pub mod district;
pub mod domain;
pub mod store;

pub use district::District;
pub use domain::{Domain, DomainTable};
pub use store::{ClimateDataStore, ClimateRecord, MissingRecordPolicy, Scenario, Series, Story};

use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use log::{debug, info, warn};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use district::Polygon;
use store::FieldMap;

/// Locations of the three input resources
#[derive(Clone, Debug)]
pub struct DataPaths {
    pub boundaries: PathBuf,
    pub records: PathBuf,
    pub stories: PathBuf,
}

impl DataPaths {
    /// Default file names inside a data directory
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            boundaries: dir.join("bd_districts.geojson"),
            records: dir.join("generated_districts.json"),
            stories: dir.join("new_climate_stories.json"),
        }
    }
}

/// Run the three sequential loads and build the store
pub fn load_store(paths: &DataPaths, policy: MissingRecordPolicy) -> Result<ClimateDataStore> {
    let districts = load_boundaries(&paths.boundaries)?;
    let records = load_records(&paths.records)?;
    let stories = load_stories(&paths.stories)?;
    let store = ClimateDataStore::load(districts, records, stories, policy)?;
    Ok(store)
}

/// Load district boundaries from a GeoJSON file
pub fn load_boundaries(path: &Path) -> Result<Vec<District>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read boundaries from {}", path.display()))?;
    let districts = parse_boundaries(&content)
        .with_context(|| format!("failed to parse boundaries in {}", path.display()))?;
    info!("read {} district boundaries from {}", districts.len(), path.display());
    Ok(districts)
}

/// Parse a GeoJSON document into districts.
/// Features need a `NAME_3` (district) property; `NAME_1` (division) may be absent.
pub fn parse_boundaries(content: &str) -> Result<Vec<District>> {
    let geojson: GeoJson = content.parse()?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => anyhow::bail!("expected a feature collection, found a bare geometry"),
    };

    let mut districts = Vec::with_capacity(features.len());
    for (i, feature) in features.into_iter().enumerate() {
        let props = feature.properties.as_ref();

        let Some(name) = props.and_then(|p| p.get("NAME_3")).and_then(|v| v.as_str()) else {
            warn!("skipping feature {} without a NAME_3 property", i);
            continue;
        };
        let division = props
            .and_then(|p| p.get("NAME_1"))
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let mut polygons = Vec::new();
        if let Some(ref geometry) = feature.geometry {
            collect_polygons(geometry, &mut polygons);
        }
        if polygons.is_empty() {
            debug!("district {} has no polygon geometry", name);
        }

        districts.push(District::new(name, division, polygons));
    }

    Ok(districts)
}

fn collect_polygons(geometry: &Geometry, out: &mut Vec<Polygon>) {
    let to_ring = |coords: &Vec<Vec<f64>>| coords.iter().map(|c| (c[0], c[1])).collect::<Vec<_>>();

    match &geometry.value {
        Value::Polygon(rings) => {
            out.push(rings.iter().map(to_ring).collect());
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                out.push(rings.iter().map(to_ring).collect());
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_polygons(g, out);
            }
        }
        _ => {}
    }
}

#[derive(Deserialize)]
struct RecordsFile {
    districts: Vec<RawRecord>,
}

#[derive(Deserialize)]
struct RawRecord {
    name: String,
    #[serde(rename = "futureData", default)]
    future_data: HashMap<String, RawField>,
    #[serde(rename = "historicalData", default)]
    historical_data: Option<HashMap<String, RawField>>,
}

/// A series entry is either a climate figure or descriptive text such as `timeRange`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn into_series(raw: HashMap<String, RawField>) -> Series {
    let mut fields = FieldMap::with_capacity(raw.len());
    let mut time_range = None;
    for (key, value) in raw {
        match value {
            RawField::Number(v) => {
                fields.insert(key, v);
            }
            RawField::Text(text) if key == "timeRange" => time_range = Some(text),
            RawField::Text(_) | RawField::Other(_) => {
                debug!("ignoring non-numeric field {}", key);
            }
        }
    }
    Series { time_range, fields }
}

/// Load climate records (`{"districts": [...]}`)
pub fn load_records(path: &Path) -> Result<Vec<ClimateRecord>> {
    let mut bytes = fs::read(path)
        .with_context(|| format!("failed to read climate records from {}", path.display()))?;
    let records = parse_records(&mut bytes)
        .with_context(|| format!("failed to parse climate records in {}", path.display()))?;
    info!("read {} climate records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse climate records; the buffer is used as scratch space by the parser
pub fn parse_records(bytes: &mut [u8]) -> Result<Vec<ClimateRecord>> {
    let file: RecordsFile = simd_json::serde::from_slice(bytes)?;
    Ok(file
        .districts
        .into_iter()
        .map(|raw| ClimateRecord {
            name: raw.name,
            future: into_series(raw.future_data),
            historical: raw.historical_data.map(into_series),
        })
        .collect())
}

/// Story entries are full objects once scraped, bare URLs when scraping failed
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStory {
    Full(Story),
    Link(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStories {
    List(Vec<RawStory>),
    Other(IgnoredAny),
}

/// Load story links; a missing file means no stories
pub fn load_stories(path: &Path) -> Result<HashMap<String, Vec<Story>>> {
    if !path.exists() {
        warn!("no story file at {}, continuing without stories", path.display());
        return Ok(HashMap::new());
    }
    let mut bytes = fs::read(path)
        .with_context(|| format!("failed to read stories from {}", path.display()))?;
    let stories = parse_stories(&mut bytes)
        .with_context(|| format!("failed to parse stories in {}", path.display()))?;
    info!("read stories for {} districts from {}", stories.len(), path.display());
    Ok(stories)
}

pub fn parse_stories(bytes: &mut [u8]) -> Result<HashMap<String, Vec<Story>>> {
    let raw: HashMap<String, RawStories> = simd_json::serde::from_slice(bytes)?;
    Ok(raw
        .into_iter()
        .filter_map(|(district, entries)| match entries {
            RawStories::List(list) => {
                let stories = list
                    .into_iter()
                    .map(|entry| match entry {
                        RawStory::Full(story) => story,
                        RawStory::Link(url) => Story {
                            headline: url.clone(),
                            url: Some(url),
                            image: None,
                        },
                    })
                    .collect();
                Some((district, stories))
            }
            RawStories::Other(_) => {
                warn!("stories for {} are not a list, ignoring", district);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "NAME_1": "Dhaka", "NAME_3": "Gazipur" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[90.0, 24.0], [90.5, 24.0], [90.5, 24.5], [90.0, 24.5], [90.0, 24.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME_1": "Chittagong", "NAME_3": "Bhola" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[90.6, 22.2], [90.9, 22.2], [90.9, 22.6], [90.6, 22.2]]],
                        [[[91.0, 22.0], [91.1, 22.0], [91.1, 22.1], [91.0, 22.0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME_1": "Nowhere" },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_boundaries() {
        let districts = parse_boundaries(BOUNDARIES).unwrap();
        assert_eq!(districts.len(), 2);

        assert_eq!(districts[0].name, "Gazipur");
        assert_eq!(districts[0].division, "Dhaka");
        assert_eq!(districts[0].polygons.len(), 1);
        assert_eq!(districts[0].bounds, (90.0, 24.0, 90.5, 24.5));

        assert_eq!(districts[1].name, "Bhola");
        assert_eq!(districts[1].polygons.len(), 2);
    }

    #[test]
    fn test_parse_records_skips_text_fields() {
        let mut json = br#"{
            "districts": [
                {
                    "name": "Gazipur",
                    "historicalData": { "timeRange": "1974-2020", "meanTemperature": 25.1, "nCdd": 4800, "nHotDays40": 3.5 },
                    "futureData": { "timeRange": "2030-2050", "meanTemperature": 26.9, "nCdd": 5900, "nHotDays40": 21.25 }
                },
                { "name": "Bhola", "futureData": { "meanTemperature": 27.2, "notes": [1, 2] } }
            ]
        }"#
        .to_vec();

        let records = parse_records(&mut json).unwrap();
        assert_eq!(records.len(), 2);

        let gazipur = &records[0];
        assert_eq!(gazipur.future.time_range.as_deref(), Some("2030-2050"));
        assert_eq!(gazipur.future.fields.len(), 3);
        assert_eq!(gazipur.future.fields["nCdd"], 5900.0);
        let historical = gazipur.historical.as_ref().unwrap();
        assert_eq!(historical.time_range.as_deref(), Some("1974-2020"));
        assert_eq!(historical.fields["meanTemperature"], 25.1);

        let bhola = &records[1];
        assert!(bhola.historical.is_none());
        assert_eq!(bhola.future.fields.len(), 1);
        assert!(bhola.future.time_range.is_none());
    }

    #[test]
    fn test_parse_records_rejects_malformed() {
        let mut json = br#"{ "regions": [] }"#.to_vec();
        assert!(parse_records(&mut json).is_err());
    }

    #[test]
    fn test_parse_stories_mixed_entries() {
        let mut json = br#"{
            "Gazipur": [
                { "url": "https://example.org/a", "headline": "Heat stress in garment belt", "image": "data/images/Gazipur_1.jpg" },
                "https://example.org/unreachable"
            ],
            "Bhola": [ { "headline": "Cyclone shelters fill", "image": "data/images/Bhola_1.jpg" } ],
            "Broken": "not a list"
        }"#
        .to_vec();

        let stories = parse_stories(&mut json).unwrap();
        assert_eq!(stories.len(), 2);

        let gazipur = &stories["Gazipur"];
        assert_eq!(gazipur.len(), 2);
        assert_eq!(gazipur[0].headline, "Heat stress in garment belt");
        assert_eq!(gazipur[1].url.as_deref(), Some("https://example.org/unreachable"));
        assert!(gazipur[1].image.is_none());

        assert!(stories["Bhola"][0].url.is_none());
    }

    #[test]
    fn test_missing_story_file_is_empty() {
        let stories = load_stories(Path::new("definitely/not/here.json")).unwrap();
        assert!(stories.is_empty());
    }

    #[test]
    fn test_default_paths() {
        let paths = DataPaths::in_dir(Path::new("data"));
        assert_eq!(paths.boundaries, Path::new("data/bd_districts.geojson"));
        assert_eq!(paths.records, Path::new("data/generated_districts.json"));
        assert_eq!(paths.stories, Path::new("data/new_climate_stories.json"));
    }
}
