//! End-to-end tests against a mock portal.
//!
//! One wiremock server plays both CAS and the academic system, so every
//! cookie lands on the same host and the session's jar carries all of them.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{
    body_string_contains, header, header_regex, method, path, path_regex, query_param,
    query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ccnu_portal::{AcademicPortal, CourseSource, Credential, Period, PortalConfig, PortalError};

const STUDENT: &str = "2021212345";
const PASSWORD: &str = "secret";

const LOGIN_PAGE: &str = r#"<html><body>
<form id="fm1" action="/cas/login" method="post">
  <input name="username" value="" />
  <input name="password" type="password" value="" />
  <input type="hidden" name="lt" value="LT-7-abc" />
  <input type="hidden" name="execution" value="e1s1" />
  <input type="hidden" name="_eventId" value="submit" />
  <input name="submit" type="submit" value="LOGIN" />
</form></body></html>"#;

// ── helpers ──

fn credential() -> Credential {
    Credential::new(STUDENT, PASSWORD)
}

fn portal_for(server: &MockServer) -> AcademicPortal {
    AcademicPortal::new(PortalConfig::with_base_url(&server.uri()))
}

/// Mount the CAS preflight page, a credential check, and the SSO hop.
async fn mount_cas(server: &MockServer, expected_logins: u64) {
    Mock::given(method("GET"))
        .and(path("/cas/login"))
        .and(query_param_is_missing("service"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=PRE123; Path=/")
                .set_body_string(LOGIN_PAGE),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/cas/login"))
        .and(body_string_contains(format!("password={PASSWORD}")))
        .and(body_string_contains("lt=LT-7-abc"))
        .and(body_string_contains("execution=e1s1"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "CASTGC=TGT-1; Path=/"),
        )
        .expect(expected_logins)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/cas/login"))
        .and(body_string_contains("password=wrong"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(server)
        .await;

    let sso = format!("{}/sso/pziotlogin", server.uri());
    Mock::given(method("GET"))
        .and(path("/cas/login"))
        .and(query_param("service", sso.as_str()))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{sso}?ticket=ST-1").as_str()),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sso/pziotlogin"))
        .and(query_param("ticket", "ST-1"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "XKSESSION=XK-1; Path=/"),
        )
        .mount(server)
        .await;
}

fn grade_summary_body() -> serde_json::Value {
    json!({
        "items": [
            {
                "jsxm": "宋冰玉", "kch": "45000012", "kcmc": "数据结构",
                "kcxzmc": "专业主干课程", "kkbmmc": "计算机学院", "xf": "3.0",
                "cj": "82", "jxb_id": "JXB-A", "jxbmc": "数据结构-01",
                "xnm": "2023", "xqmmc": "1"
            },
            {
                "jsxm": "张三", "kch": "41000001", "kcmc": "军事理论",
                "kcxzmc": "通识必修课", "kkbmmc": "武装部", "xf": "N/A",
                "cj": "85", "jxb_id": "JXB-B", "jxbmc": "军事理论-03",
                "xnm": "2023", "xqmmc": "1"
            }
        ],
        "totalResult": 2
    })
}

async fn mount_grade_summary(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/jwglxt/cjcx/cjcx_cxXsgrcj.html"))
        .and(query_param("gnmkdm", "N305005"))
        .and(header_regex("cookie", "XKSESSION=XK-1"))
        .and(header(
            "content-type",
            "application/x-www-form-urlencoded;charset=UTF-8",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(grade_summary_body()))
        .mount(server)
        .await;
}

async fn mount_breakdowns(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/jwglxt/cjcx/cjcx_cxXsXmcjList.html"))
        .and(header_regex("cookie", "XKSESSION=XK-1"))
        .and(header_regex("cookie", "CASTGC=TGT-1"))
        .and(body_string_contains("jxb_id=JXB-A"))
        .and(body_string_contains("xqm=3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "xmblmc": "平时(30%)", "xmcj": "70" },
                { "xmblmc": "期末(70%)", "xmcj": "90" },
                { "xmblmc": "总评", "xmcj": "82" }
            ]
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/jwglxt/cjcx/cjcx_cxXsXmcjList.html"))
        .and(header_regex("cookie", "XKSESSION=XK-1"))
        .and(header_regex("cookie", "CASTGC=TGT-1"))
        .and(body_string_contains("jxb_id=JXB-B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [ { "xmblmc": "总评", "xmcj": "85" } ]
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ── login ──

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;

    let ok = portal_for(&server).login(&credential()).await.unwrap();
    assert!(ok);
}

#[tokio::test]
async fn test_login_posts_to_session_qualified_url() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;

    portal_for(&server).login(&credential()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("credential POST was sent");
    assert!(
        post.url.path().contains("jsessionid=PRE123"),
        "login URL should carry the preflight JSESSIONID, got {}",
        post.url
    );
    let body = String::from_utf8_lossy(&post.body);
    assert!(body.contains("username=2021212345"));
    assert!(body.contains("_eventId=submit"));
    assert!(body.contains("submit=LOGIN"));
}

#[tokio::test]
async fn test_login_without_cookie_is_invalid_credential() {
    let server = MockServer::start().await;
    mount_cas(&server, 0).await;

    let err = portal_for(&server)
        .login(&Credential::new(STUDENT, "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::InvalidCredential));
    assert!(err.is_authoritative());
}

#[tokio::test]
async fn test_connection_refused_is_network_failure() {
    // Nothing listens on port 1.
    let portal = AcademicPortal::new(PortalConfig::with_base_url("http://127.0.0.1:1"));
    let err = portal.login(&credential()).await.unwrap_err();
    assert!(matches!(err, PortalError::NetworkFailure(_)), "got {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_login_timeout_is_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cas/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(LOGIN_PAGE)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut config = PortalConfig::with_base_url(&server.uri());
    config.auth_timeout = Duration::from_millis(100);
    let err = AcademicPortal::new(config)
        .login(&credential())
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::NetworkFailure(_)), "got {err:?}");
}

#[tokio::test]
async fn test_login_page_without_tokens_is_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cas/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = portal_for(&server).login(&credential()).await.unwrap_err();
    assert!(matches!(err, PortalError::ParseFailure(_)), "got {err:?}");
}

// ── course list ──

#[tokio::test]
async fn test_course_list_legacy() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/jwglxt/xkcx/xkmdcx_cxXkmdcxIndex.html"))
        .and(query_param("doType", "query"))
        .and(query_param("gnmkdm", "N255010"))
        .and(query_param("su", STUDENT))
        .and(header_regex("cookie", "XKSESSION=XK-1"))
        .and(body_string_contains("xnm=&xqm=12"))
        .and(body_string_contains("queryModel.showCount=1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "kch": "45000012", "kcmc": "数据结构",
                "jsxx": "2008980036/宋冰玉/讲师,1234567/张三/教授",
                "xnm": "2022", "xqmc": "2", "kkxymc": "计算机学院",
                "jxbmc": "数据结构-01", "kcxzmc": "专业主干课程", "xf": "3.5"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let period = Period::parse("0", "2").unwrap();
    let courses = portal_for(&server)
        .course_list(&credential(), &period, CourseSource::Legacy)
        .await
        .unwrap();

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].teacher, "宋冰玉,张三");
    assert_eq!(courses[0].credit, 3.5);
    assert_eq!(courses[0].year, "2022");
    assert_eq!(courses[0].term, "2");
}

#[tokio::test]
async fn test_course_list_grade_derived_stamps_year_and_term() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;
    mount_grade_summary(&server).await;

    let courses = portal_for(&server)
        .course_list(&credential(), &Period::all(), CourseSource::GradeDerived)
        .await
        .unwrap();

    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].name, "数据结构");
    assert_eq!(courses[0].year, "2023");
    assert_eq!(courses[0].term, "1");
    assert_eq!(courses[1].credit, 0.0);
}

// ── grades ──

#[tokio::test]
async fn test_grades_summary() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;
    mount_grade_summary(&server).await;

    let grades = portal_for(&server)
        .grades(&credential(), &Period::parse("2023", "1").unwrap())
        .await
        .unwrap();

    assert_eq!(grades.len(), 2);
    assert_eq!(grades[0].total, 82.0);
    assert_eq!(grades[0].class_section_id, "JXB-A");
    assert_eq!(grades[0].regular, 0.0);
    assert_eq!(grades[1].course.teacher, "张三");
}

#[tokio::test]
async fn test_grades_are_repeatable() {
    let server = MockServer::start().await;
    mount_cas(&server, 2).await;
    mount_grade_summary(&server).await;

    let portal = portal_for(&server);
    let period = Period::parse("2023", "1").unwrap();
    let first = portal.grades(&credential(), &period).await.unwrap();
    let second = portal.grades(&credential(), &period).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_grades_html_response_is_parse_failure() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/jwglxt/cjcx/cjcx_cxXsgrcj.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>请先登录</html>"))
        .mount(&server)
        .await;

    let err = portal_for(&server)
        .grades(&credential(), &Period::all())
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::ParseFailure(_)), "got {err:?}");
}

#[tokio::test]
async fn test_grades_server_error_is_network_failure() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/jwglxt/cjcx/cjcx_cxXsgrcj.html"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = portal_for(&server)
        .grades(&credential(), &Period::all())
        .await
        .unwrap_err();
    assert!(err.is_transient(), "got {err:?}");
}

async fn mount_slow_grade_summary(server: &MockServer, delay: Duration) {
    Mock::given(method("POST"))
        .and(path("/jwglxt/cjcx/cjcx_cxXsgrcj.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(grade_summary_body())
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

fn portal_with_timeouts(server: &MockServer, auth_ms: u64, scrape_ms: u64) -> AcademicPortal {
    let mut config = PortalConfig::with_base_url(&server.uri());
    config.auth_timeout = Duration::from_millis(auth_ms);
    config.scrape_timeout = Duration::from_millis(scrape_ms);
    AcademicPortal::new(config)
}

#[tokio::test]
async fn test_scrape_outlasting_auth_timeout_succeeds() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;
    mount_slow_grade_summary(&server, Duration::from_millis(400)).await;

    let grades = portal_with_timeouts(&server, 200, 1500)
        .grades(&credential(), &Period::all())
        .await
        .unwrap();
    assert_eq!(grades.len(), 2);
}

#[tokio::test]
async fn test_scrape_beyond_scrape_timeout_is_network_failure() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;
    mount_slow_grade_summary(&server, Duration::from_millis(400)).await;

    let err = portal_with_timeouts(&server, 1500, 200)
        .grades(&credential(), &Period::all())
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::NetworkFailure(_)), "got {err:?}");
}

// ── detailed grades ──

#[tokio::test]
async fn test_detailed_grades_reuse_one_session() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;
    mount_grade_summary(&server).await;
    mount_breakdowns(&server).await;

    let grades = portal_for(&server)
        .detailed_grades(&credential(), &Period::parse("2023", "1").unwrap())
        .await
        .unwrap();

    assert_eq!(grades.len(), 2);

    let ds = &grades[0];
    assert_eq!((ds.regular, ds.final_score, ds.total), (70.0, 90.0, 82.0));

    let military = &grades[1];
    assert_eq!(
        (military.regular, military.final_score, military.total),
        (85.0, 85.0, 85.0)
    );

    // One credential POST, one breakdown per summary row.
    server.verify().await;
}

#[tokio::test]
async fn test_detailed_grades_abort_on_breakdown_failure() {
    let server = MockServer::start().await;
    mount_cas(&server, 1).await;
    mount_grade_summary(&server).await;
    Mock::given(method("POST"))
        .and(path("/jwglxt/cjcx/cjcx_cxXsXmcjList.html"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = portal_for(&server)
        .detailed_grades(&credential(), &Period::all())
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::NetworkFailure(_)), "got {err:?}");
    server.verify().await;
}

#[tokio::test]
async fn test_detailed_grades_invalid_credential() {
    let server = MockServer::start().await;
    mount_cas(&server, 0).await;

    let err = portal_for(&server)
        .detailed_grades(&Credential::new(STUDENT, "wrong"), &Period::all())
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::InvalidCredential));
}
