//!
//! # layoutdb21 Unit Tests
//!

use std::path::PathBuf;

use crate::bbox::{BoundBox, BoundBoxTrait};
use crate::cell::CellView;
use crate::error::{DbError, DbResult};
use crate::geom::{EndStyle, Orient, Point, Rect, Shape, ShapeTrait};
use crate::layout::{
    ArraySpec, BlockageType, BoundaryType, InstBuilder, Layout, ParamVal, Via, ViaBuilder,
};
use crate::library::{LayoutLibrary, LibMeta};
use crate::sch::{SchCell, SchCellView, SchematicWriter, PART_NAME_PROP};
use crate::tech::{Layer, Layers, Tech, ViaDef, DRAWING_PURPOSE};
use crate::utils::{EnumStr, SerdeFile, SerializationFormat};

/// Initialize test logging. Repeat calls are no-ops.
fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn point_ops() {
    let p = Point::new(1, 2);
    assert_eq!(p.x, 1);
    assert_eq!(p.y, 2);
    assert_eq!(Point::new(1, 1) + Point::new(2, 2), Point::new(3, 3));
    assert_eq!(Point::new(2, 2) - Point::new(1, 1), Point::new(1, 1));
    assert_eq!(Point::new(3, 4).shift(&Point::new(10, 20)), Point::new(13, 24));
}
#[test]
fn orient_strings() {
    // Each orientation maps to its conventional name, and back
    for (orient, name) in [
        (Orient::R0, "R0"),
        (Orient::R90, "R90"),
        (Orient::R180, "R180"),
        (Orient::R270, "R270"),
        (Orient::MX, "MX"),
        (Orient::MY, "MY"),
        (Orient::MXR90, "MXR90"),
        (Orient::MYR90, "MYR90"),
    ] {
        assert_eq!(orient.to_str(), name);
        assert_eq!(Orient::from_str(name), Some(orient));
    }
    assert_eq!(Orient::from_str("R45"), None);
    assert_eq!(Orient::default(), Orient::R0);
}
#[test]
fn orient_application() {
    let p = Point::new(2, 1);
    assert_eq!(Orient::R0.apply(p), Point::new(2, 1));
    assert_eq!(Orient::R90.apply(p), Point::new(-1, 2));
    assert_eq!(Orient::R180.apply(p), Point::new(-2, -1));
    assert_eq!(Orient::R270.apply(p), Point::new(1, -2));
    assert_eq!(Orient::MX.apply(p), Point::new(2, -1));
    assert_eq!(Orient::MY.apply(p), Point::new(-2, 1));
    assert_eq!(Orient::MXR90.apply(p), Point::new(1, 2));
    assert_eq!(Orient::MYR90.apply(p), Point::new(-1, -2));
}
#[test]
fn shape_transforms() {
    // Rect corners re-normalize after orientation
    let r = Shape::Rect(Rect::new(Point::new(0, 0), Point::new(20, 10)));
    let placed = r.transformed(Orient::R90, Point::new(100, 100));
    assert_eq!(
        placed,
        Shape::Rect(Rect::new(Point::new(90, 100), Point::new(100, 120)))
    );
    // And shapes contain their own corners, inclusively
    assert!(placed.contains(&Point::new(90, 100)));
    assert!(placed.contains(&Point::new(100, 120)));
    assert!(!placed.contains(&Point::new(101, 100)));
}
#[test]
fn bboxes() {
    let bx = BoundBox::from_points(Point::new(10, 20), Point::new(-10, -20));
    assert_eq!(bx.p0, Point::new(-10, -20));
    assert_eq!(bx.p1, Point::new(10, 20));
    assert_eq!(bx.center(), Point::new(0, 0));
    assert_eq!(bx.width(), 20);
    assert_eq!(bx.height(), 40);
    let grown = bx.expand(5, 10).shift(&Point::new(1, 2));
    assert_eq!(grown.p0, Point::new(-14, -28));
    assert_eq!(grown.p1, Point::new(16, 32));
    assert!(BoundBox::empty().is_empty());
    assert!(!bx.is_empty());

    let r = Rect::new(Point::new(0, 0), Point::new(4, 2));
    assert_eq!(r.bbox().center(), Point::new(2, 1));
}
#[test]
fn layer_lookups() {
    // Retrieve from the [Layers] each way
    let mut layers = Layers::default();
    layers.add(Layer::new(68, "met1"));
    layers.add(Layer::new(69, "met2"));
    let l = layers.name("met1").unwrap();
    assert_eq!(l.num, 68);
    let l = layers.num(69).unwrap();
    assert_eq!(l.name, "met2");
    assert!(layers.name("met3").is_none());
    assert_eq!(layers.keyname("met1"), Some(layers.keynum(68).unwrap()));
}
#[test]
fn default_purposes() {
    // New technologies know the reserved `drawing` purpose and nothing else
    let tech = Tech::new("faux350");
    assert_eq!(tech.purposes.num("drawing"), Some(DRAWING_PURPOSE));
    assert_eq!(tech.purposes.name(DRAWING_PURPOSE), Some("drawing"));
    assert_eq!(tech.purposes.num("pin"), None);
    assert_eq!(tech.dbu_per_uu, 1000);
}
#[test]
fn tech_roundtrip() -> DbResult<()> {
    let tech = test_tech();
    let yaml = SerializationFormat::Yaml.to_string(&tech)?;
    let back: Tech = SerializationFormat::Yaml.from_str(&yaml)?;
    assert_eq!(back.name, tech.name);
    assert_eq!(back.dbu_per_uu, tech.dbu_per_uu);
    assert_eq!(back.layers.name("M1").unwrap().num, 1);
    assert_eq!(back.purposes.num("drawing"), Some(DRAWING_PURPOSE));
    assert_eq!(back.viadefs.find("M2_M1"), tech.viadefs.find("M2_M1"));
    Ok(())
}
#[test]
fn via_enclosure_edges() {
    // Asymmetric per-side edges fold into margin-plus-offset form
    let via = Via::new("M2_M1", (0.0, 0.0))
        .with_enclosure_edges([0.04, 0.05, 0.0, 0.0], [0.0, 0.0, 0.06, 0.05]);
    assert_eq!(via.enc1, Some((0.02, 0.025)));
    assert_eq!(via.off1, (-0.02, -0.025));
    assert_eq!(via.enc2, Some((0.03, 0.025)));
    assert_eq!(via.off2, (0.03, 0.025));
}
#[test]
fn layout_builder() {
    let mut layout = Layout::new();
    layout.add_rect(("M1", "drawing"), (0.0, 0.0), (1.0, 2.0));
    assert_eq!(layout.rects.len(), 1);
    assert_eq!(layout.rects[0].array, ArraySpec::default());
    assert_eq!(layout.rects[0].array.nx, 1);

    layout.add_pin("clk", "clk0", "clk:", ("M2", "pin"), (0.0, 0.0), (0.1, 0.1));
    assert!(layout.pins[0].make_pin);

    let inst = InstBuilder::default()
        .lib_name("prims")
        .cell_name("nmos")
        .view_name("layout")
        .inst_name("XM0")
        .loc((1.5, -0.5))
        .orient(Orient::MX)
        .params(
            [("w".to_string(), ParamVal::Float(0.42))]
                .into_iter()
                .collect::<std::collections::HashMap<_, _>>(),
        )
        .build()
        .unwrap();
    layout.add_inst(inst);
    assert_eq!(layout.insts[0].rows, 1);
    assert_eq!(layout.insts[0].orient, Orient::MX);
}

/// Create the [Tech] used by the on-disk tests
fn test_tech() -> Tech {
    let mut tech = Tech::new("faux350");
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
    tech
}
/// Create a technology library and lib-defs file under `dir`.
/// Returns the lib-defs path.
fn setup_tech_lib(dir: &std::path::Path) -> DbResult<PathBuf> {
    let tech_dir = dir.join("tech00");
    std::fs::create_dir_all(&tech_dir)?;
    test_tech().save_in(&tech_dir, SerializationFormat::Yaml)?;
    let defs_path = dir.join("lib.defs");
    std::fs::write(&defs_path, "DEFINE tech00 tech00\n")?;
    Ok(defs_path)
}

#[test]
fn it_creates_libraries() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = setup_tech_lib(dir.path())?;

    // First open creates the library, and registers it in the lib-defs file
    let lib = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("scratch"), "tech00")?;
    assert_eq!(lib.name(), "scratch");
    assert!(lib.path().is_dir());
    assert_eq!(lib.dbu_per_uu(), 1000);
    lib.close()?;

    let defs = libdefs21::parse_file(&defs_path)?;
    let table = defs.resolve(dir.path())?;
    assert!(table.get("scratch").is_some());

    // Second open finds it, resolving tech through the attached tech library
    let lib = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("ignored"), "tech00")?;
    assert_eq!(lib.path(), dir.path().join("scratch").as_path());
    assert_eq!(lib.tech().name, "faux350");
    lib.close()?;

    // And the metadata file records the attachment
    let meta = LibMeta::open_in(dir.path().join("scratch"))?.unwrap();
    assert_eq!(meta.tech_lib.as_deref(), Some("tech00"));
    Ok(())
}
#[test]
fn it_fails_without_tech() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = dir.path().join("lib.defs");
    std::fs::write(&defs_path, "# no libraries yet\n")?;
    let e = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("scratch"), "nonesuch");
    assert!(matches!(e, Err(DbError::Open { .. })));
    Ok(())
}
#[test]
fn it_writes_cell_views() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = setup_tech_lib(dir.path())?;
    let mut lib = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("scratch"), "tech00")?;
    lib.add_purpose("pin", 251);

    let mut layout = Layout::new();
    layout.add_rect_array(
        ("M1", "drawing"),
        (0.0, 0.0),
        (0.2, 0.1),
        ArraySpec::new(3, 2, 0.25, 0.2),
    );
    layout.add_pin("foo", "foo1", "foo:", ("M2", "pin"), (0.5, 0.5), (0.7, 0.6));
    let via = ViaBuilder::default()
        .via_id("M2_M1")
        .loc((0.6, 0.6))
        .rows(2usize)
        .cols(3usize)
        .spacing(Some((0.06, 0.06)))
        .array(ArraySpec::new(4, 1, 0.5, 0.0))
        .build()
        .unwrap()
        .with_enclosure_edges([0.04, 0.05, 0.0, 0.0], [0.0, 0.0, 0.06, 0.05]);
    layout.add_via(via);

    let view = lib.create_layout("testcell", "layout", &layout)?;
    assert_eq!(view.cell_name, "testcell");
    assert_eq!(view.view_name, "layout");
    assert_eq!(view.dbu_per_uu, 1000);

    // The 3x2 rect array lands as six rects on (M1, drawing)
    let m1_rects: Vec<&Shape> = view
        .elems
        .iter()
        .filter(|e| e.layer == 1 && e.purpose == DRAWING_PURPOSE)
        .map(|e| &e.shape)
        .collect();
    let first = Shape::Rect(Rect::new(Point::new(0, 0), Point::new(200, 100)));
    assert!(m1_rects.contains(&&first));
    let last = Shape::Rect(Rect::new(Point::new(500, 200), Point::new(700, 300)));
    assert!(m1_rects.contains(&&last));

    // The via: 2x3 cuts, arrayed 4x in x, plus enclosures on M1 and M2
    let cuts: Vec<&Shape> = view
        .elems
        .iter()
        .filter(|e| e.layer == 2)
        .map(|e| &e.shape)
        .collect();
    assert_eq!(cuts.len(), 2 * 3 * 4);
    // First cut of the first placement: cut array centered at (600, 600)
    let cut0 = Shape::Rect(Rect::new(Point::new(480, 530), Point::new(520, 570)));
    assert!(cuts.contains(&&cut0));
    // And of the last placement, 1.5um to the right
    let cut0_arrayed = Shape::Rect(Rect::new(Point::new(1980, 530), Point::new(2020, 570)));
    assert!(cuts.contains(&&cut0_arrayed));
    // Bottom-layer enclosure: margin (20, 25), offset (-20, -25)
    let bot = Shape::Rect(Rect::new(Point::new(440, 480), Point::new(720, 670)));
    assert!(view
        .elems
        .iter()
        .any(|e| e.layer == 1 && e.shape == bot));
    // Top-layer enclosure: margin (30, 25), offset (30, 25)
    let top = Shape::Rect(Rect::new(Point::new(480, 530), Point::new(780, 720)));
    assert!(view
        .elems
        .iter()
        .any(|e| e.layer == 3 && e.shape == top));
    // Ten M1 elements in all: six rects and four via enclosures
    assert_eq!(
        view.elems.iter().filter(|e| e.layer == 1).count(),
        6 + 4
    );

    // The pin: one label, one terminal, one pin figure
    assert_eq!(view.labels.len(), 1);
    let label = &view.labels[0];
    assert_eq!(label.string, "foo:");
    assert_eq!(label.loc, Point::new(600, 550));
    assert_eq!(label.orient, Orient::R0);
    assert_eq!(label.height, 100);
    assert_eq!(label.purpose, 251);
    assert_eq!(view.terms.len(), 1);
    assert_eq!(view.terms[0].name, "foo");
    assert_eq!(view.terms[0].pins.len(), 1);
    assert_eq!(view.terms[0].pins[0].name, "foo1");
    assert_eq!(
        view.terms[0].pins[0].rect,
        Rect::new(Point::new(500, 500), Point::new(700, 600))
    );

    // Written views read back identically
    let reloaded = lib.read_layout("testcell", "layout")?;
    assert_eq!(reloaded, view);
    lib.close()?;
    Ok(())
}
#[test]
fn it_orients_tall_pin_labels() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = setup_tech_lib(dir.path())?;
    let lib = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("scratch"), "tech00")?;
    let mut layout = Layout::new();
    // Taller than wide: label rotates to R90, sized to the box width
    layout.add_pin("vdd", "vdd0", "vdd!", ("M1", "drawing"), (0.0, 0.0), (0.1, 0.4));
    let view = lib.create_layout("tallpin", "layout", &layout)?;
    assert_eq!(view.labels[0].orient, Orient::R90);
    assert_eq!(view.labels[0].height, 100);
    assert_eq!(view.labels[0].loc, Point::new(50, 200));
    lib.close()?;
    Ok(())
}
#[test]
fn it_accumulates_terminals() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = setup_tech_lib(dir.path())?;
    let lib = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("scratch"), "tech00")?;
    let mut layout = Layout::new();
    // Two pins on the same net share one terminal
    layout.add_pin("out", "out_a", "out", ("M1", "drawing"), (0.0, 0.0), (0.1, 0.1));
    layout.add_pin("out", "out_b", "out", ("M2", "drawing"), (1.0, 0.0), (1.1, 0.1));
    let view = lib.create_layout("twopin", "layout", &layout)?;
    assert_eq!(view.terms.len(), 1);
    assert_eq!(view.terms[0].pins.len(), 2);
    assert_eq!(view.labels.len(), 2);
    lib.close()?;
    Ok(())
}
#[test]
fn it_skips_unknown_names() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = setup_tech_lib(dir.path())?;
    let lib = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("scratch"), "tech00")?;
    let mut layout = Layout::new();
    layout.add_rect(("M9", "drawing"), (0.0, 0.0), (1.0, 1.0)); // unknown layer
    layout.add_rect(("M1", "nonesuch"), (0.0, 0.0), (1.0, 1.0)); // unknown purpose
    layout.add_via(Via::new("V9", (0.0, 0.0))); // unknown via-definition
    layout.add_rect(("M1", "drawing"), (0.0, 0.0), (1.0, 1.0)); // and one good one
    let view = lib.create_layout("mostly_skipped", "layout", &layout)?;
    assert_eq!(view.elems.len(), 1);
    lib.close()?;
    Ok(())
}
#[test]
fn it_rejects_degenerate_arrays() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = setup_tech_lib(dir.path())?;
    let lib = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("scratch"), "tech00")?;
    let mut layout = Layout::new();
    layout.add_rect_array(("M1", "drawing"), (0.0, 0.0), (1.0, 1.0), ArraySpec::new(0, 1, 0.0, 0.0));
    let e = lib.create_layout("badarray", "layout", &layout);
    assert!(matches!(e, Err(DbError::Write { .. })));
    lib.close()?;
    Ok(())
}
#[test]
fn it_writes_paths_polygons_blockages_boundaries() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = setup_tech_lib(dir.path())?;
    let lib = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("scratch"), "tech00")?;
    let mut layout = Layout::new();
    layout.add_path_seg(
        ("M1", "drawing"),
        (0.0, 0.0),
        (1.0, 0.0),
        0.1,
        EndStyle::Truncate,
        EndStyle::Extend,
    );
    layout.add_path_seg(
        ("M1", "drawing"),
        (0.0, 0.0),
        (1.0, 1.0),
        0.1,
        EndStyle::Round,
        EndStyle::Round,
    );
    layout.add_polygon(
        ("M1", "drawing"),
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
    );
    layout.add_blockage(
        BlockageType::Routing,
        Some("M2"),
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
    );
    layout.add_blockage(
        BlockageType::Placement,
        None,
        vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)],
    );
    layout.add_boundary(BoundaryType::Pr, vec![(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
    let view = lib.create_layout("shapes", "layout", &layout)?;

    // Orthogonal segments round to even widths directly
    match &view.elems[0].shape {
        Shape::Path(p) => {
            assert_eq!(p.width, 100);
            assert_eq!(p.begin_style, EndStyle::Truncate);
            assert_eq!(p.end_style, EndStyle::Extend);
            assert_eq!(p.points, vec![Point::new(0, 0), Point::new(1000, 0)]);
        }
        other => panic!("expected path, got {:?}", other),
    }
    // Diagonal segments measure width against the 45-degree axis
    match &view.elems[1].shape {
        Shape::Path(p) => assert_eq!(p.width, 70),
        other => panic!("expected path, got {:?}", other),
    }
    match &view.elems[2].shape {
        Shape::Polygon(p) => assert_eq!(p.points.len(), 3),
        other => panic!("expected polygon, got {:?}", other),
    }
    assert_eq!(view.blockages.len(), 2);
    assert_eq!(view.blockages[0].layer, Some(3));
    assert_eq!(view.blockages[1].layer, None);
    assert_eq!(view.blockages[1].blockage_type, BlockageType::Placement);
    assert_eq!(view.boundaries.len(), 1);
    assert_eq!(view.boundaries[0].boundary_type, BoundaryType::Pr);
    lib.close()?;
    Ok(())
}
#[test]
fn it_rejects_degenerate_polygons() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = setup_tech_lib(dir.path())?;
    let lib = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("scratch"), "tech00")?;
    let mut layout = Layout::new();
    layout.add_polygon(("M1", "drawing"), vec![(0.0, 0.0), (1.0, 0.0)]);
    let e = lib.create_layout("badpoly", "layout", &layout);
    assert!(matches!(e, Err(DbError::Write { .. })));
    lib.close()?;
    Ok(())
}
#[test]
fn it_writes_instances() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = setup_tech_lib(dir.path())?;
    let lib = LayoutLibrary::open(&defs_path, "scratch", dir.path().join("scratch"), "tech00")?;
    let mut layout = Layout::new();
    let inst = InstBuilder::default()
        .lib_name("prims")
        .cell_name("nmos")
        .view_name("layout")
        .inst_name("XM0")
        .loc((1.5, -0.5))
        .orient(Orient::R270)
        .rows(2usize)
        .cols(4usize)
        .sp_rows(0.8)
        .sp_cols(0.6)
        .params(
            [
                ("w".to_string(), ParamVal::Float(0.42)),
                ("nf".to_string(), ParamVal::Int(4)),
                ("model".to_string(), ParamVal::Str("fast".to_string())),
            ]
            .into_iter()
            .collect::<std::collections::HashMap<_, _>>(),
        )
        .build()
        .unwrap();
    layout.add_inst(inst);
    let view = lib.create_layout("hier", "layout", &layout)?;
    assert_eq!(view.insts.len(), 1);
    let inst = &view.insts[0];
    assert_eq!(inst.loc, Point::new(1500, -500));
    assert_eq!(inst.orient, Orient::R270);
    assert_eq!((inst.rows, inst.cols), (2, 4));
    assert_eq!((inst.sp_rows, inst.sp_cols), (800, 600));
    assert_eq!(inst.params.get("nf"), Some(&ParamVal::Int(4)));
    lib.close()?;
    Ok(())
}

/// Write a [SchCellView] fixture into `lib_dir`
fn write_sch_view(
    lib_dir: &std::path::Path,
    cell: &str,
    view: &str,
    part_name: Option<&str>,
) -> DbResult<()> {
    let mut data = SchCellView {
        cell_name: cell.to_string(),
        pins: vec!["inp".to_string(), "out".to_string()],
        ..Default::default()
    };
    if let Some(part) = part_name {
        data.props
            .insert(PART_NAME_PROP.to_string(), ParamVal::Str(part.to_string()));
    }
    std::fs::create_dir_all(lib_dir.join(cell))?;
    data.save(
        SerializationFormat::Yaml,
        crate::cell::view_path(lib_dir, cell, view, SerializationFormat::Yaml),
    )?;
    Ok(())
}
#[test]
fn it_copies_schematics() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let src_dir = dir.path().join("src");
    let dst_dir = dir.path().join("dst");
    std::fs::create_dir_all(&src_dir)?;
    std::fs::create_dir_all(&dst_dir)?;
    let defs_path = dir.path().join("lib.defs");
    std::fs::write(&defs_path, "DEFINE src src\nDEFINE dst dst\n")?;
    write_sch_view(&src_dir, "amp", "schematic", None)?;
    write_sch_view(&src_dir, "amp", "symbol", Some("amp"))?;

    let writer = SchematicWriter::open(&defs_path, "dst")?;
    writer.create_schematics(
        &[SchCell::new("src", "amp", "amp_v2")],
        "schematic",
        "symbol",
    )?;

    let sch_path = crate::cell::find_view(&dst_dir, "amp_v2", "schematic").unwrap();
    let sch = SchCellView::open_from_path(&sch_path)?;
    assert_eq!(sch.cell_name, "amp_v2");
    assert_eq!(sch.pins, vec!["inp".to_string(), "out".to_string()]);

    let sym_path = crate::cell::find_view(&dst_dir, "amp_v2", "symbol").unwrap();
    let sym = SchCellView::open_from_path(&sym_path)?;
    assert_eq!(sym.cell_name, "amp_v2");
    assert_eq!(
        sym.props.get(PART_NAME_PROP),
        Some(&ParamVal::Str("amp_v2".to_string()))
    );
    Ok(())
}
#[test]
fn it_copies_symbols_without_part_names() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let src_dir = dir.path().join("src");
    let dst_dir = dir.path().join("dst");
    std::fs::create_dir_all(&src_dir)?;
    std::fs::create_dir_all(&dst_dir)?;
    let defs_path = dir.path().join("lib.defs");
    std::fs::write(&defs_path, "DEFINE src src\nDEFINE dst dst\n")?;
    write_sch_view(&src_dir, "res", "schematic", None)?;
    write_sch_view(&src_dir, "res", "symbol", None)?;

    let writer = SchematicWriter::open(&defs_path, "dst")?;
    writer.create_schematics(&[SchCell::new("src", "res", "res_v2")], "schematic", "symbol")?;

    let sym_path = crate::cell::find_view(&dst_dir, "res_v2", "symbol").unwrap();
    let sym = SchCellView::open_from_path(&sym_path)?;
    assert_eq!(sym.cell_name, "res_v2");
    assert!(!sym.props.contains_key(PART_NAME_PROP));
    Ok(())
}
#[test]
fn it_fails_on_undefined_destinations() -> DbResult<()> {
    init_logs();
    let dir = tempfile::tempdir()?;
    let defs_path = dir.path().join("lib.defs");
    std::fs::write(&defs_path, "# empty\n")?;
    let e = SchematicWriter::open(&defs_path, "nonesuch");
    assert!(matches!(e, Err(DbError::Open { .. })));
    Ok(())
}

#[test]
fn view_roundtrip_formats() -> DbResult<()> {
    // Cell views survive every supported serialization format
    let mut view = CellView::new("rt", "layout", 1000);
    view.elems.push(crate::cell::Element {
        net: None,
        layer: 1,
        purpose: DRAWING_PURPOSE,
        shape: Shape::Rect(Rect::new(Point::new(0, 0), Point::new(10, 10))),
    });
    for fmt in [SerializationFormat::Json, SerializationFormat::Yaml] {
        let txt = fmt.to_string(&view)?;
        let back: CellView = fmt.from_str(&txt)?;
        assert_eq!(back, view);
    }
    Ok(())
}
