use sheetsift_http::{FetchError, WorkbookFetcher};
use sheetsift_sheet::{CellValue, Sheet};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn workbook_bytes() -> Vec<u8> {
    Sheet::from_data(vec![
        vec![CellValue::from("Name"), CellValue::from("Phone")],
        vec![CellValue::from("Ann"), CellValue::Null],
        vec![CellValue::from("Ben"), CellValue::from("555-0101")],
    ])
    .to_xlsx_bytes()
    .unwrap()
}

#[tokio::test]
async fn test_fetch_sheet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contacts.xlsx"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(workbook_bytes()))
        .mount(&server)
        .await;

    let fetcher = WorkbookFetcher::new().unwrap();
    let sheet = fetcher
        .fetch_sheet(&format!("{}/contacts.xlsx", server.uri()))
        .await
        .unwrap();

    assert_eq!(sheet.headers(), &["Name", "Phone"]);
    assert_eq!(sheet.row_count(), 2);
    assert!(sheet.cell(0, 1).unwrap().is_null());
}

#[tokio::test]
async fn test_fetch_sheet_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contacts.xlsx"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(workbook_bytes()))
        .mount(&server)
        .await;

    let fetcher = WorkbookFetcher::with_timeout(5).unwrap();
    let names = fetcher
        .fetch_sheet_names(&format!("{}/contacts.xlsx", server.uri()))
        .await
        .unwrap();

    assert_eq!(names, vec!["Sheet1"]);
}

#[tokio::test]
async fn test_fetch_named_sheet_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contacts.xlsx"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(workbook_bytes()))
        .mount(&server)
        .await;

    let fetcher = WorkbookFetcher::new().unwrap();
    let result = fetcher
        .fetch_named_sheet(&format!("{}/contacts.xlsx", server.uri()), Some("Nope"))
        .await;

    assert!(matches!(result, Err(FetchError::Workbook { .. })));
}

#[tokio::test]
async fn test_fetch_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.xlsx"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = WorkbookFetcher::new().unwrap();
    let result = fetcher
        .fetch_bytes(&format!("{}/missing.xlsx", server.uri()))
        .await;

    match result {
        Err(FetchError::Status { status, reason }) => {
            assert_eq!(status, 404);
            assert_eq!(reason, "Not Found");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_not_a_workbook() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("just some text"))
        .mount(&server)
        .await;

    let fetcher = WorkbookFetcher::new().unwrap();
    let result = fetcher
        .fetch_sheet(&format!("{}/notes.txt", server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Workbook { .. })));
}
