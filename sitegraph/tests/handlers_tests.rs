use sitegraph::handlers::*;
use sitegraph_core::GraphDocument;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SAMPLE_DOCUMENT: &str = r#"{
    "nodes": [
        {"name": "index.html", "type": "Html", "value": 1.0, "path": "/index.html"},
        {"name": "app.js", "type": "JavaScript", "value": 0.5, "path": "/app.js"}
    ],
    "links": [
        {"source": 0, "target": 1}
    ]
}"#;

#[test]
fn test_looks_like_url() {
    assert!(looks_like_url("http://example.com/data.json"));
    assert!(looks_like_url("https://example.com/data.json"));
    assert!(!looks_like_url("data.json"));
    assert!(!looks_like_url("./graphs/data.json"));
    assert!(!looks_like_url("~/graphs/data.json"));
    assert!(!looks_like_url("ftp://example.com/data.json"));
}

#[test]
fn test_read_document_valid() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    write!(temp_file, "{}", SAMPLE_DOCUMENT)?;

    let document = read_document(temp_file.path().to_str().unwrap())?;

    assert_eq!(document.node_count(), 2);
    assert_eq!(document.link_count(), 1);
    Ok(())
}

#[test]
fn test_read_document_invalid_json() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "this is not json").unwrap();

    let result = read_document(temp_file.path().to_str().unwrap());

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Invalid graph document"));
}

#[test]
fn test_read_document_dangling_link() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(
        temp_file,
        r#"{{"nodes": [{{"name": "a", "type": "Html", "value": 1.0, "path": "/a"}}],
            "links": [{{"source": 0, "target": 9}}]}}"#
    )
    .unwrap();

    let result = read_document(temp_file.path().to_str().unwrap());

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("link"));
}

#[test]
fn test_read_document_missing_file() {
    let result = read_document("/no/such/file.json");

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to read"));
}

#[tokio::test]
async fn test_load_document_from_path() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    write!(temp_file, "{}", SAMPLE_DOCUMENT)?;

    let document = load_document_from_source(temp_file.path().to_str().unwrap()).await?;

    assert_eq!(document.node_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_fetch_document_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_DOCUMENT))
        .mount(&server)
        .await;

    let document = fetch_document(&format!("{}/data.json", server.uri()))
        .await
        .unwrap();

    assert_eq!(document.node_count(), 2);
    assert_eq!(document.link_count(), 1);
}

#[tokio::test]
async fn test_fetch_document_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = fetch_document(&format!("{}/missing.json", server.uri())).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("HTTP 404"));
}

#[tokio::test]
async fn test_load_document_from_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_DOCUMENT))
        .mount(&server)
        .await;

    let document = load_document_from_source(&format!("{}/data.json", server.uri()))
        .await
        .unwrap();

    assert_eq!(document.node_count(), 2);
}

#[test]
fn test_write_output_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("dist").join("deep").join("graph.svg");

    write_output(&nested, "<svg/>").unwrap();

    assert_eq!(std::fs::read_to_string(&nested).unwrap(), "<svg/>");
}

#[test]
fn test_render_document_svg_pipeline() {
    let document = GraphDocument::from_json(SAMPLE_DOCUMENT).unwrap();

    let svg = render_document(&document, "svg", 960, 600, 50).unwrap();

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("index.html"));
    assert!(svg.contains("app.js"));
}

#[test]
fn test_render_document_dot() {
    let document = GraphDocument::from_json(SAMPLE_DOCUMENT).unwrap();

    let dot = render_document(&document, "dot", 960, 600, 50).unwrap();

    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("n0 -> n1;"));
}
