//! Reader for the subset of the Tiled TMX format the levels use: orthogonal
//! maps with CSV-encoded tile layers and one embedded atlas tileset.
//!
//! Layer data stays raw here (the CSV text); turning it into tile ids is the
//! level loader's job via `parse_csv_tiles`.

#[derive(Debug, Clone, PartialEq)]
pub struct TiledMap {
    pub width: usize,
    pub tile_width: i32,
    pub layers: Vec<TiledLayer>,
    pub tileset_image: Option<TilesetImage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TiledLayer {
    pub name: String,
    pub csv: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilesetImage {
    pub source: String,
    pub width: Option<i32>,
}

impl TiledMap {
    pub fn parse(xml: &str) -> Result<Self, String> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| format!("Invalid TMX: {e}"))?;
        let map = doc.root_element();
        if !map.has_tag_name("map") {
            return Err(format!(
                "Invalid TMX: root element is <{}>, expected <map>",
                map.tag_name().name()
            ));
        }

        let width: usize = required_attribute(map, "width")?;
        let tile_width: i32 = required_attribute(map, "tilewidth")?;
        if width == 0 || tile_width <= 0 {
            return Err("Invalid TMX: width and tilewidth must be > 0".to_string());
        }

        let mut layers = Vec::new();
        for layer in map.children().filter(|n| n.has_tag_name("layer")) {
            let name = layer.attribute("name").unwrap_or_default().to_string();
            let Some(data) = layer.children().find(|n| n.has_tag_name("data")) else {
                return Err(format!("Invalid TMX: layer '{name}' has no <data>"));
            };
            match data.attribute("encoding") {
                Some("csv") => {}
                other => {
                    return Err(format!(
                        "Invalid TMX: layer '{name}' uses encoding {other:?}, only csv is supported"
                    ))
                }
            }
            layers.push(TiledLayer {
                name,
                csv: data.text().unwrap_or_default().to_string(),
            });
        }

        let tileset_image = map
            .children()
            .filter(|n| n.has_tag_name("tileset"))
            .flat_map(|tileset| tileset.children())
            .find(|n| n.has_tag_name("image"))
            .and_then(|image| {
                let source = image.attribute("source")?.to_string();
                let width = image.attribute("width").and_then(|w| w.parse().ok());
                Some(TilesetImage { source, width })
            });

        Ok(Self {
            width,
            tile_width,
            layers,
            tileset_image,
        })
    }

    pub fn layer_csv(&self, name: &str) -> Result<&str, String> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| layer.csv.as_str())
            .ok_or_else(|| format!("no layer in map named {name}"))
    }
}

fn required_attribute<T: std::str::FromStr>(
    node: roxmltree::Node<'_, '_>,
    name: &str,
) -> Result<T, String> {
    let raw = node
        .attribute(name)
        .ok_or_else(|| format!("Invalid TMX: <map> is missing '{name}'"))?;
    raw.parse()
        .map_err(|_| format!("Invalid TMX: <map> attribute '{name}' is not a number: {raw}"))
}

/// Decode a CSV layer of 1-based ids into 0-based ids where `-1` is empty.
/// Blank cells count as 0 (empty); whitespace and line breaks are ignored.
pub fn parse_csv_tiles(csv: &str) -> Result<Vec<i32>, String> {
    csv.split(',')
        .enumerate()
        .map(|(index, cell)| {
            let cell = cell.trim();
            if cell.is_empty() {
                return Ok(-1);
            }
            cell.parse::<i32>()
                .map(|id| id - 1)
                .map_err(|_| format!("Invalid tile id '{cell}' at cell {index}"))
        })
        .collect()
}

#[cfg(test)]
pub(crate) const SAMPLE_TMX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.9" orientation="orthogonal" width="4" height="3" tilewidth="16" tileheight="16">
 <tileset firstgid="1" name="base" tilewidth="16" tileheight="16" columns="16">
  <image source="base.png" width="256" height="320"/>
 </tileset>
 <layer id="1" name="base" width="4" height="3">
  <data encoding="csv">
0,0,0,0,
0,0,0,0,
1,1,7,1
</data>
 </layer>
 <layer id="2" name="objects" width="4" height="3">
  <data encoding="csv">
0,273,0,0,
0,0,0,275,
0,0,0,0
</data>
 </layer>
</map>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_ids_shift_to_zero_based_with_empty_sentinel() {
        let tiles = parse_csv_tiles("1,2,0,17,\n,274,\n3").unwrap();
        assert_eq!(tiles, vec![0, 1, -1, 16, -1, 273, 2]);
    }

    #[test]
    fn csv_rejects_garbage_cells() {
        let err = parse_csv_tiles("1,x,3").expect_err("non-numeric cell should fail");
        assert!(err.contains("'x'"));
        assert!(err.contains("cell 1"));
    }

    #[test]
    fn parse_reads_map_metrics_layers_and_tileset() {
        let map = TiledMap::parse(SAMPLE_TMX).expect("sample map should parse");
        assert_eq!(map.width, 4);
        assert_eq!(map.tile_width, 16);
        assert_eq!(map.layers.len(), 2);
        assert_eq!(
            map.tileset_image,
            Some(TilesetImage {
                source: "base.png".to_string(),
                width: Some(256),
            })
        );
        let base = parse_csv_tiles(map.layer_csv("base").unwrap()).unwrap();
        assert_eq!(base.len(), 12);
        assert_eq!(&base[8..], &[0, 0, 6, 0]);
    }

    #[test]
    fn missing_layer_names_the_layer() {
        let map = TiledMap::parse(SAMPLE_TMX).unwrap();
        let err = map.layer_csv("decor").expect_err("missing layer should fail");
        assert_eq!(err, "no layer in map named decor");
    }

    #[test]
    fn parse_rejects_non_csv_layers() {
        let xml = r#"<map width="1" tilewidth="16"><layer name="base"><data encoding="base64">AAAA</data></layer></map>"#;
        let err = TiledMap::parse(xml).expect_err("base64 layers are unsupported");
        assert!(err.contains("only csv"));
    }

    #[test]
    fn parse_rejects_missing_width() {
        let xml = r#"<map tilewidth="16"></map>"#;
        let err = TiledMap::parse(xml).expect_err("width is required");
        assert!(err.contains("'width'"));
    }

    #[test]
    fn parse_rejects_malformed_xml() {
        assert!(TiledMap::parse("<map width=").is_err());
    }
}
