use crate::path::fmt;
use crate::scene::MapScene;
use std::fmt::Write as _;

/// Serializes a scene to a standalone SVG document.
///
/// The root element carries explicit namespace, size and viewBox attributes
/// and every presentation property is inlined, so the output never depends
/// on an ambient stylesheet. Fill paths draw no stroke of their own; the
/// boundary layer is the only stroked layer, which keeps shared edges from
/// double-stroking.
pub fn render_svg(scene: &MapScene) -> String {
    let mut out = String::new();
    let _ = writeln!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="max-width: 100%; height: auto;">"#,
        w = fmt(scene.width),
        h = fmt(scene.height),
    );

    out.push_str(r#"<g class="region-fills">"#);
    out.push('\n');
    for region in &scene.regions {
        let _ = write!(
            &mut out,
            r#"<path d="{}" fill="{}" stroke="none" data-name="{}""#,
            region.path,
            escape_xml(&region.fill),
            escape_xml(&region.name),
        );
        if let Some(value_text) = &region.value_text {
            let _ = write!(&mut out, r#" data-value="{}""#, escape_xml(value_text));
        }
        out.push('>');
        let _ = write!(&mut out, "<title>{}", escape_xml(&region.name));
        if let Some(value_text) = &region.value_text {
            let _ = write!(&mut out, ": {}", escape_xml(value_text));
        }
        out.push_str("</title></path>\n");
    }
    out.push_str("</g>\n");

    if !scene.boundary_path.is_empty() {
        let _ = writeln!(
            &mut out,
            r#"<path class="domain-boundary" d="{}" fill="none" stroke="{}" stroke-width="1"/>"#,
            scene.boundary_path,
            escape_xml(&scene.border_color),
        );
    }

    if scene.regions.iter().any(|r| r.label.is_some()) {
        out.push_str(r#"<g class="region-labels">"#);
        out.push('\n');
        for label in scene.regions.iter().filter_map(|r| r.label.as_ref()) {
            let _ = writeln!(
                &mut out,
                r#"<text x="{}" y="{}" text-anchor="middle" dy=".35em" fill="{}" font-family="sans-serif" font-size="{}" font-weight="bold" pointer-events="none">{}</text>"#,
                fmt(label.x),
                fmt(label.y),
                escape_xml(&scene.label_color),
                escape_xml(&scene.label_size),
                escape_xml(&label.text),
            );
        }
        out.push_str("</g>\n");
    }

    out.push_str("</svg>\n");
    out
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::layout_scene;
    use crate::test_fixtures::{us_boundaries, world_boundaries};
    use choroplot_core::{MapDataset, MapDomain, RegionRecord, StylingConfig};

    fn world_dataset() -> MapDataset {
        MapDataset::from_regions(
            MapDomain::World,
            vec![
                RegionRecord {
                    name: "France".into(),
                    code: "FRA".into(),
                    label: "France".into(),
                    value: 40000.0,
                },
                RegionRecord {
                    name: "Germany".into(),
                    code: "DEU".into(),
                    label: "Germany".into(),
                    value: 45000.0,
                },
            ],
            StylingConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn output_is_a_standalone_svg_document() {
        let scene = layout_scene(&world_dataset(), &world_boundaries()).unwrap();
        let svg = render_svg(&scene);
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "svg");
        assert_eq!(root.attribute("viewBox"), Some("0 0 960 600"));
        assert_eq!(root.attribute("width"), Some("960"));
        assert_eq!(root.attribute("height"), Some("600"));
    }

    #[test]
    fn fills_never_stroke_and_boundary_never_fills() {
        let scene = layout_scene(&world_dataset(), &world_boundaries()).unwrap();
        let svg = render_svg(&scene);
        let doc = roxmltree::Document::parse(&svg).unwrap();
        for node in doc.descendants().filter(|n| n.has_tag_name("path")) {
            if node.attribute("class") == Some("domain-boundary") {
                assert_eq!(node.attribute("fill"), Some("none"));
                assert_eq!(node.attribute("stroke-width"), Some("1"));
            } else {
                assert_eq!(node.attribute("stroke"), Some("none"));
                assert_ne!(node.attribute("fill"), Some("none"));
            }
        }
    }

    #[test]
    fn tooltip_titles_carry_name_and_formatted_value() {
        let scene = layout_scene(&world_dataset(), &world_boundaries()).unwrap();
        let svg = render_svg(&scene);
        assert!(svg.contains("<title>France: $40,000</title>"));
        assert!(svg.contains("<title>Germany: $45,000</title>"));
        assert!(svg.contains("<title>Spain</title>"));
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let boundaries = world_boundaries();
        let dataset = world_dataset();
        let a = render_svg(&layout_scene(&dataset, &boundaries).unwrap());
        let b = render_svg(&layout_scene(&dataset, &boundaries).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn labels_rendered_at_centroids_for_matched_regions_only() {
        let mut styling = StylingConfig::default();
        styling.show_labels = true;
        let dataset = MapDataset {
            domain: MapDomain::Us,
            regions: vec![RegionRecord {
                name: "Montana".into(),
                code: "MT".into(),
                label: "Montana".into(),
                value: 100.0,
            }],
            min_value: 0.0,
            max_value: 100.0,
            styling,
        };
        let svg = render_svg(&layout_scene(&dataset, &us_boundaries()).unwrap());
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let texts: Vec<_> = doc.descendants().filter(|n| n.has_tag_name("text")).collect();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text(), Some("MT"));
        assert_eq!(texts[0].attribute("text-anchor"), Some("middle"));
    }

    #[test]
    fn escaped_names_do_not_break_the_document() {
        let mut boundaries = world_boundaries();
        let props = boundaries.fills.features[0].properties.as_mut().unwrap();
        props.insert("NAME".into(), serde_json::json!("Côte <d'Ivoire> & Co"));
        let dataset = MapDataset::from_regions(
            MapDomain::World,
            vec![RegionRecord {
                name: "Germany".into(),
                code: "DEU".into(),
                label: "Germany".into(),
                value: 1.0,
            }],
            StylingConfig::default(),
        )
        .unwrap();
        let svg = render_svg(&layout_scene(&dataset, &boundaries).unwrap());
        assert!(roxmltree::Document::parse(&svg).is_ok());
    }
}
