//! Browser-backed tests; need a local Chrome/Chromium, run with `--ignored`

#![cfg(feature = "cdp")]

use deckpress::cdp::CdpEngine;
use deckpress::{
    assemble, style, ColorMode, DomSurface, Engine, ExportConfig, NoopObserver, PageFormat, SlideSurface,
};
use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;
use tiny_http::{Response, Server};

static INIT: Once = Once::new();

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/deck.html")
}

fn start_deck_server() -> String {
    INIT.call_once(|| {
        let html = std::fs::read_to_string(fixture()).unwrap();
        std::thread::spawn(move || {
            let server = Server::http("127.0.0.1:18093").unwrap();
            for request in server.incoming_requests() {
                let resp = Response::from_string(html.clone())
                    .with_header("Content-Type: text/html".parse::<tiny_http::Header>().unwrap());
                let _ = request.respond(resp);
            }
        });
        std::thread::sleep(Duration::from_millis(100));
    });

    "http://127.0.0.1:18093/deck.html".to_string()
}

#[test]
#[ignore]
fn isolates_and_verifies_served_deck() {
    let url = start_deck_server();
    let config = ExportConfig::default();
    let engine = CdpEngine::new(config.engine.clone()).expect("Failed to create engine");
    let mut surface = DomSurface::new(engine, &config);

    assert_eq!(surface.load(&url).expect("load"), 11);
    style::inject(&mut surface, &config.selectors, ColorMode::Color).expect("inject");

    for index in [0, 3, 5, 10] {
        deckpress::isolate::isolate(&mut surface, index, 11).expect("isolate");
        surface.settle(Duration::from_millis(600)).expect("settle");
        let v = deckpress::verify::verify(&mut surface, index, &config.verify).expect("verify");
        assert!(v.matches(), "slide {} not on canvas: {:?}", index, v.visible);
    }

    let fit = deckpress::autoscale::autoscale(&mut surface, &config.fit).expect("autoscale");
    assert_eq!(fit.scale, 1.0);

    let page = surface.print_page(&PageFormat::default()).expect("print");
    assert_eq!(assemble::count_pages(&page).unwrap(), 1);

    surface.into_engine().close().unwrap();
}

#[test]
#[ignore]
fn exports_fixture_deck_to_both_variants() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig {
        input: fixture(),
        output_dir: dir.path().to_path_buf(),
        ..ExportConfig::default()
    };

    let report = deckpress::export_deck(&config, &NoopObserver).expect("export");

    assert_eq!(report.documents.len(), 2);
    for doc in &report.documents {
        assert_eq!(doc.pages, 11);
        let bytes = std::fs::read(&doc.path).unwrap();
        assert_eq!(assemble::count_pages(&bytes).unwrap(), 11);
    }
    // the process slide overflows the fixture canvas
    assert!(report.variants[0].slides[5].scale < 1.0);
    assert_eq!(report.variants[0].mismatches(), 0);
}
