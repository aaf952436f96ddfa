use std::path::PathBuf;

use folio_cli::{check_scene, jump, simulate, visibility, CheckStatus, Scene};

fn demo() -> Scene {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/portfolio.toml");
    Scene::load(&path).unwrap()
}

#[test]
fn demo_scene_is_valid() {
    let results = check_scene(&demo());
    assert!(results.iter().all(|r| r.status == CheckStatus::Ok), "{results:?}");
}

#[test]
fn sweep_visits_every_section_in_order() {
    let scene = demo();
    let samples = simulate(&scene, 50.0).unwrap();

    let mut visited: Vec<String> = Vec::new();
    for sample in &samples {
        if let Some(section) = &sample.current_section {
            if visited.last() != Some(section) {
                visited.push(section.clone());
            }
        }
    }
    assert_eq!(visited, scene.section_ids());
}

#[test]
fn sweep_ends_settled_at_bottom() {
    let samples = simulate(&demo(), 100.0).unwrap();
    let last = samples.last().unwrap();

    assert_eq!(last.offset, 3400.0);
    assert_eq!(last.progress, 1.0);
    assert!(!last.is_scrolling);
    assert_eq!(last.direction, "down");
}

#[test]
fn culled_elements_keep_neutral_style() {
    let samples = simulate(&demo(), 100.0).unwrap();
    let first = &samples[0];
    let portrait = first.elements.iter().find(|e| e.name == "portrait").unwrap();

    assert_eq!(portrait.progress, None);
    assert_eq!(portrait.transform, "none");
    assert_eq!(portrait.opacity, 1.0);
}

#[test]
fn visibility_at_offset() {
    let visible = visibility(&demo(), 900.0).unwrap();
    let ids: Vec<&str> = visible.iter().map(|(id, _)| id.as_str()).collect();

    assert_eq!(ids, ["hero", "projects", "about", "contact"]);
    assert_eq!(visible[0].1, 0.0);
    assert_eq!(visible[1].1, 0.5);
    assert_eq!(visible[3].1, 0.0);
}

#[test]
fn jump_keeps_header_clear() {
    let scene = demo();

    assert_eq!(jump(&scene, 0.0, "about", None).unwrap(), Some(2420.0));
    assert_eq!(jump(&scene, 1000.0, "about", Some(0.0)).unwrap(), Some(2500.0));
    // Clamped to the scrollable range
    assert_eq!(jump(&scene, 0.0, "contact", Some(0.0)).unwrap(), Some(3400.0));
    assert_eq!(jump(&scene, 0.0, "missing-id", None).unwrap(), None);
}
