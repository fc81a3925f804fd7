//!
//! # Library-Writing Example
//!
//! Builds a small technology library, opens (creating) a design library
//! through a lib-defs file, and writes one cell layout into it:
//! an arrayed rectangle, a pin, and an arrayed via.
//!

use layoutdb21::layout::{ArraySpec, ViaBuilder};
use layoutdb21::tech::{Layer, ViaDef};
use layoutdb21::utils::SerializationFormat;
use layoutdb21::{DbResult, Layout, LayoutLibrary, Tech};

fn main() -> DbResult<()> {
    env_logger::init();
    let workdir = tempfile::tempdir()?;

    // Set up a technology library with a few layers and one via-definition
    let mut tech = Tech::new("demo_tech");
    tech.layers.add(Layer::new(1, "M1"));
    tech.layers.add(Layer::new(2, "V1"));
    tech.layers.add(Layer::new(3, "M2"));
    tech.viadefs.add(ViaDef {
        name: "M2_M1".to_string(),
        bot_layer: "M1".to_string(),
        cut_layer: "V1".to_string(),
        top_layer: "M2".to_string(),
        cut_size: (40, 40),
        cut_spacing: (50, 50),
        enc1: (5, 5),
        enc2: (5, 5),
    });
    let tech_dir = workdir.path().join("demo_tech");
    std::fs::create_dir_all(&tech_dir)?;
    tech.save_in(&tech_dir, SerializationFormat::Yaml)?;

    // Register it in a lib-defs file
    let defs_path = workdir.path().join("lib.defs");
    std::fs::write(&defs_path, "DEFINE demo_tech demo_tech\n")?;

    // Build a layout: an arrayed rect, a pin, and an arrayed via
    let mut layout = Layout::new();
    layout.add_rect_array(
        ("M1", "drawing"),
        (0.0, 0.0),
        (0.2, 0.1),
        ArraySpec::new(3, 2, 0.25, 0.2),
    );
    layout.add_pin("foo", "foo1", "foo:", ("M2", "pin"), (0.5, 0.5), (0.7, 0.6));
    layout.add_via(
        ViaBuilder::default()
            .via_id("M2_M1")
            .loc((0.6, 0.6))
            .rows(2usize)
            .cols(3usize)
            .spacing(Some((0.06, 0.06)))
            .array(ArraySpec::new(4, 1, 0.5, 0.0))
            .build()
            .expect("via spec")
            .with_enclosure_edges([0.04, 0.05, 0.0, 0.0], [0.0, 0.0, 0.06, 0.05]),
    );

    // Open (create) the destination library and write the cell
    let mut lib = LayoutLibrary::open(&defs_path, "demo_lib", workdir.path().join("demo_lib"), "demo_tech")?;
    lib.add_purpose("pin", 251);
    let view = lib.create_layout("demo_cell", "layout", &layout)?;
    println!(
        "wrote {}/{}: {} elements, {} labels, {} terminals",
        view.cell_name,
        view.view_name,
        view.elems.len(),
        view.labels.len(),
        view.terms.len()
    );
    lib.close()?;
    Ok(())
}
