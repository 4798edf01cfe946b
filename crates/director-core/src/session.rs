//! Per-view state container.
//!
//! Holds the inputs, results, loading flags and the single shared error slot
//! of one directing session, and sequences the state transitions around each
//! backend call.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::DirectorApi;
use crate::error::{DirectorError, DirectorResult};
use crate::health::{ConnectionStatus, ProbeReport};
use crate::model::{
    DeepDiveResponse, DirectorResponse, NewsAnalyzeResponse, PerspectiveResponse, Viewpoint,
};
use crate::notes::Notes;

/// One flag per request kind.
///
/// A request holds the session mutably for its whole duration, so observers
/// follow the flags through [`Session::watch_loading`] rather than by
/// borrowing the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub director: bool,
    pub deep_dive: bool,
    pub perspective: bool,
    pub news_search: bool,
    pub news_analyze: bool,
}

impl LoadingFlags {
    pub fn any(&self) -> bool {
        self.director || self.deep_dive || self.perspective || self.news_search || self.news_analyze
    }
}

pub struct Session {
    api: Arc<dyn DirectorApi>,
    api_status: ConnectionStatus,
    last_probe: Option<ProbeReport>,
    current_situation: Option<String>,
    director: Option<DirectorResponse>,
    deep_dive: Option<DeepDiveResponse>,
    perspective: Option<PerspectiveResponse>,
    news_topic: Option<String>,
    news_articles: Option<Vec<String>>,
    news_analysis: Option<NewsAnalyzeResponse>,
    loading: watch::Sender<LoadingFlags>,
    error: Option<String>,
    pub notes: Notes,
}

impl Session {
    pub fn new(api: Arc<dyn DirectorApi>) -> Self {
        Self {
            api,
            api_status: ConnectionStatus::Checking,
            last_probe: None,
            current_situation: None,
            director: None,
            deep_dive: None,
            perspective: None,
            news_topic: None,
            news_articles: None,
            news_analysis: None,
            loading: watch::channel(LoadingFlags::default()).0,
            error: None,
            notes: Notes::default(),
        }
    }

    // Connection

    /// Run a connection test now and adopt its result.
    pub async fn test_connection(&mut self) -> &ProbeReport {
        self.api_status = ConnectionStatus::Checking;
        let report = self.api.probe().await;
        self.apply_probe(report);
        self.last_probe.get_or_insert_with(ProbeReport::pending)
    }

    /// Adopt a report produced elsewhere, e.g. by the health monitor.
    pub fn apply_probe(&mut self, report: ProbeReport) {
        if report.status != self.api_status {
            debug!(from = %self.api_status, to = %report.status, "Session status updated");
        }
        self.api_status = report.status;
        self.last_probe = Some(report);
    }

    // Directing

    /// Submit a situation for directing.
    ///
    /// Blank input never reaches the backend. While offline the request is
    /// refused and the offline message is placed in the error slot.
    pub async fn submit_situation(&mut self, text: &str) -> DirectorResult<&DirectorResponse> {
        let situation = text.trim();
        if situation.is_empty() {
            return Err(DirectorError::EmptyInput("현장 상황"));
        }

        if self.api_status.is_offline() {
            self.error = Some(DirectorError::Offline.to_string());
            return Err(DirectorError::Offline);
        }

        info!(chars = situation.chars().count(), "Submitting situation");
        self.set_loading(|f| f.director = true);
        self.error = None;
        self.current_situation = Some(situation.to_string());
        self.director = None;
        self.deep_dive = None;
        self.perspective = None;

        let result = self.api.direct(situation).await;
        self.set_loading(|f| f.director = false);

        let response = self.settle(result)?;
        Ok(&*self.director.insert(response))
    }

    // Deep dive

    /// Deep dive on an explicit topic.
    pub async fn deep_dive(&mut self, topic: &str) -> DirectorResult<&DeepDiveResponse> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DirectorError::EmptyInput("분석 주제"));
        }

        self.set_loading(|f| f.deep_dive = true);
        let result = self.api.deep_dive(topic).await;
        self.set_loading(|f| f.deep_dive = false);

        let response = self.settle(result)?;
        Ok(&*self.deep_dive.insert(response))
    }

    /// Deep dive on the first issue of the current guidance.
    pub async fn deep_dive_first_issue(&mut self) -> DirectorResult<&DeepDiveResponse> {
        let topic = self
            .director
            .as_ref()
            .and_then(|d| d.issues.first())
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .ok_or(DirectorError::NoTopic)?;

        self.deep_dive(&topic).await
    }

    // Perspective

    /// Re-analyze the current situation from `viewpoint`.
    ///
    /// Needs a submitted situation and a backend not known to be offline;
    /// otherwise nothing is sent and the error slot is left alone.
    pub async fn expand_perspective(
        &mut self,
        viewpoint: Viewpoint,
    ) -> DirectorResult<&PerspectiveResponse> {
        let situation = self
            .current_situation
            .clone()
            .ok_or(DirectorError::NoSituation)?;

        if self.api_status.is_offline() {
            return Err(DirectorError::Offline);
        }

        self.set_loading(|f| f.perspective = true);
        self.error = None;
        let result = self.api.perspective(&situation, viewpoint.label()).await;
        self.set_loading(|f| f.perspective = false);

        let response = self.settle(result)?;
        Ok(&*self.perspective.insert(response))
    }

    // News

    /// First phase: fetch articles for `topic` and hold them.
    pub async fn search_news(&mut self, topic: &str) -> DirectorResult<&[String]> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DirectorError::EmptyInput("검색 주제"));
        }

        self.news_topic = Some(topic.to_string());
        self.news_articles = None;
        self.news_analysis = None;

        self.set_loading(|f| f.news_search = true);
        let result = self.api.news_search(topic).await;
        self.set_loading(|f| f.news_search = false);

        let response = self.settle(result)?;
        info!(articles = response.news_articles.len(), "News search finished");
        Ok(self.news_articles.insert(response.news_articles).as_slice())
    }

    /// Second phase: analyze the articles held from the last search.
    pub async fn analyze_news(&mut self) -> DirectorResult<&NewsAnalyzeResponse> {
        let articles = match self.news_articles.as_ref() {
            Some(a) if !a.is_empty() => a.clone(),
            _ => return Err(DirectorError::NoNewsArticles),
        };

        self.set_loading(|f| f.news_analyze = true);
        let result = self.api.news_analyze(&articles).await;
        self.set_loading(|f| f.news_analyze = false);

        let response = self.settle(result)?;
        Ok(&*self.news_analysis.insert(response))
    }

    fn set_loading(&self, update: impl FnOnce(&mut LoadingFlags)) {
        self.loading.send_modify(update);
    }

    /// Record the outcome of a call in the error slot.
    fn settle<T>(&mut self, result: DirectorResult<T>) -> DirectorResult<T> {
        match result {
            Ok(value) => {
                self.error = None;
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "Request failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // Accessors

    pub fn api_status(&self) -> ConnectionStatus {
        self.api_status
    }

    pub fn last_probe(&self) -> Option<&ProbeReport> {
        self.last_probe.as_ref()
    }

    pub fn current_situation(&self) -> Option<&str> {
        self.current_situation.as_deref()
    }

    pub fn director(&self) -> Option<&DirectorResponse> {
        self.director.as_ref()
    }

    pub fn deep_dive_result(&self) -> Option<&DeepDiveResponse> {
        self.deep_dive.as_ref()
    }

    pub fn perspective_result(&self) -> Option<&PerspectiveResponse> {
        self.perspective.as_ref()
    }

    pub fn news_topic(&self) -> Option<&str> {
        self.news_topic.as_deref()
    }

    pub fn news_articles(&self) -> Option<&[String]> {
        self.news_articles.as_deref()
    }

    pub fn news_analysis(&self) -> Option<&NewsAnalyzeResponse> {
        self.news_analysis.as_ref()
    }

    pub fn loading(&self) -> LoadingFlags {
        *self.loading.borrow()
    }

    /// Receiver that sees every loading flag change, including while a
    /// request is in flight.
    pub fn watch_loading(&self) -> watch::Receiver<LoadingFlags> {
        self.loading.subscribe()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewsSearchResponse, Perspective, QuestionGroup};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Records every call and answers from canned data.
    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<String>>,
        online: bool,
        fail_with: Option<(u16, &'static str)>,
        articles: Vec<String>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeApi {
        fn online() -> Self {
            Self {
                online: true,
                articles: vec!["기사 원문 1".into(), "기사 원문 2".into()],
                ..Default::default()
            }
        }

        fn failing(status: u16, detail: &'static str) -> Self {
            Self {
                fail_with: Some((status, detail)),
                ..Self::online()
            }
        }

        fn record(&self, call: impl Into<String>) -> DirectorResult<()> {
            self.calls.lock().unwrap().push(call.into());
            match self.fail_with {
                Some((status, detail)) => Err(DirectorError::Api {
                    status,
                    message: detail.to_string(),
                }),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn sample_director() -> DirectorResponse {
        DirectorResponse {
            issues: vec!["구조 지연 원인".into()],
            questions: vec![QuestionGroup {
                target: "해경".into(),
                questions: vec!["왜 초기 대응이 늦었는가".into()],
            }],
            angles: vec!["정부 책임론".into()],
            interpretation: "구조 시스템 실패".into(),
            additional_points: vec!["유가족 인터뷰 필요".into()],
            checklist: vec!["현장 사진 확보".into()],
        }
    }

    #[async_trait]
    impl DirectorApi for FakeApi {
        async fn probe(&self) -> ProbeReport {
            self.calls.lock().unwrap().push("probe".into());
            ProbeReport {
                status: if self.online { ConnectionStatus::Online } else { ConnectionStatus::Offline },
                message: String::new(),
                url: "fake://health".into(),
                status_code: self.online.then_some(200),
                data: None,
                checked_at: Utc::now(),
            }
        }

        async fn health(&self) -> DirectorResult<serde_json::Value> {
            self.record("health")?;
            Ok(serde_json::json!({"status": "healthy"}))
        }

        async fn examples(&self) -> DirectorResult<serde_json::Value> {
            self.record("examples")?;
            Ok(serde_json::json!({"examples": []}))
        }

        async fn direct(&self, situation: &str) -> DirectorResult<DirectorResponse> {
            self.record(format!("direct:{}", situation))?;
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(sample_director())
        }

        async fn deep_dive(&self, topic: &str) -> DirectorResult<DeepDiveResponse> {
            self.record(format!("deep_dive:{}", topic))?;
            Ok(DeepDiveResponse {
                background: "배경".into(),
                key_points: vec!["포인트".into()],
                analysis: "분석".into(),
                implications: vec![],
            })
        }

        async fn perspective(
            &self,
            situation: &str,
            perspective: &str,
        ) -> DirectorResult<PerspectiveResponse> {
            self.record(format!("perspective:{}:{}", perspective, situation))?;
            Ok(PerspectiveResponse {
                perspectives: vec![Perspective {
                    viewpoint: perspective.to_string(),
                    issues: vec![],
                    questions: vec![],
                    implications: vec![],
                }],
            })
        }

        async fn news_search(&self, topic: &str) -> DirectorResult<NewsSearchResponse> {
            self.record(format!("news_search:{}", topic))?;
            Ok(NewsSearchResponse {
                news_articles: self.articles.clone(),
            })
        }

        async fn news_analyze(&self, news_articles: &[String]) -> DirectorResult<NewsAnalyzeResponse> {
            self.record(format!("news_analyze:{}", news_articles.len()))?;
            Ok(NewsAnalyzeResponse {
                article_analyses: vec![],
                summary: "요약".into(),
            })
        }
    }

    fn session_with(api: FakeApi) -> (Session, Arc<FakeApi>) {
        let api = Arc::new(api);
        (Session::new(api.clone()), api)
    }

    #[tokio::test]
    async fn test_blank_situation_sends_nothing() {
        let (mut session, api) = session_with(FakeApi::online());

        for input in ["", "   ", "\n\t "] {
            let err = session.submit_situation(input).await.unwrap_err();
            assert!(matches!(err, DirectorError::EmptyInput(_)));
        }

        assert!(api.calls().is_empty());
        assert!(session.error().is_none());
        assert!(session.current_situation().is_none());
    }

    #[tokio::test]
    async fn test_submit_trims_and_stores() {
        let (mut session, api) = session_with(FakeApi::online());

        let response = session.submit_situation("  세월호 침몰 사고 현장 \n").await.unwrap();
        assert_eq!(response.issues, vec!["구조 지연 원인"]);

        assert_eq!(api.calls(), vec!["direct:세월호 침몰 사고 현장"]);
        assert_eq!(session.current_situation(), Some("세월호 침몰 사고 현장"));
        assert!(!session.loading().any());
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_offline_blocks_submit() {
        let (mut session, api) = session_with(FakeApi::default());
        session.test_connection().await;
        assert_eq!(session.api_status(), ConnectionStatus::Offline);

        let err = session.submit_situation("화재 현장").await.unwrap_err();
        assert!(matches!(err, DirectorError::Offline));
        assert_eq!(session.error(), Some(crate::error::OFFLINE_MESSAGE));
        assert_eq!(api.calls(), vec!["probe"]);
    }

    #[tokio::test]
    async fn test_checking_status_does_not_block() {
        let (mut session, api) = session_with(FakeApi::online());
        assert_eq!(session.api_status(), ConnectionStatus::Checking);

        session.submit_situation("교통사고").await.unwrap();
        assert_eq!(api.calls(), vec!["direct:교통사고"]);
    }

    #[tokio::test]
    async fn test_failure_fills_error_slot_until_next_success() {
        let (mut session, _api) = session_with(FakeApi::failing(500, "Gemini 응답 파싱 실패"));

        let err = session.submit_situation("화재 현장").await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini 응답 파싱 실패");
        assert_eq!(session.error(), Some("Gemini 응답 파싱 실패"));
        assert!(session.director().is_none());
        assert!(!session.loading().director);

        let (mut session, _api) = session_with(FakeApi::online());
        session.apply_probe(ProbeReport {
            status: ConnectionStatus::Offline,
            ..ProbeReport::pending()
        });
        let _ = session.submit_situation("화재 현장").await;
        assert!(session.error().is_some());

        session.apply_probe(ProbeReport {
            status: ConnectionStatus::Online,
            ..ProbeReport::pending()
        });
        session.submit_situation("화재 현장").await.unwrap();
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_new_submission_clears_follow_ups() {
        let (mut session, _api) = session_with(FakeApi::online());

        session.submit_situation("첫 번째 상황").await.unwrap();
        session.deep_dive_first_issue().await.unwrap();
        session.expand_perspective(Viewpoint::Economy).await.unwrap();
        assert!(session.deep_dive_result().is_some());
        assert!(session.perspective_result().is_some());

        session.submit_situation("두 번째 상황").await.unwrap();
        assert!(session.deep_dive_result().is_none());
        assert!(session.perspective_result().is_none());
        assert_eq!(session.current_situation(), Some("두 번째 상황"));
    }

    #[tokio::test]
    async fn test_deep_dive_uses_first_issue() {
        let (mut session, api) = session_with(FakeApi::online());

        let err = session.deep_dive_first_issue().await.unwrap_err();
        assert!(matches!(err, DirectorError::NoTopic));

        session.submit_situation("세월호 침몰 사고 현장").await.unwrap();
        session.deep_dive_first_issue().await.unwrap();

        assert_eq!(api.calls().last().unwrap(), "deep_dive:구조 지연 원인");
    }

    #[tokio::test]
    async fn test_perspective_requires_situation() {
        let (mut session, api) = session_with(FakeApi::online());

        let err = session.expand_perspective(Viewpoint::Law).await.unwrap_err();
        assert!(matches!(err, DirectorError::NoSituation));
        assert!(api.calls().is_empty());
        assert!(session.error().is_none());

        session.submit_situation("아파트 화재").await.unwrap();
        let response = session.expand_perspective(Viewpoint::Law).await.unwrap();
        assert_eq!(response.perspectives[0].viewpoint, "법제도");
        assert_eq!(api.calls().last().unwrap(), "perspective:법제도:아파트 화재");
    }

    #[tokio::test]
    async fn test_perspective_refused_while_offline() {
        let (mut session, api) = session_with(FakeApi::online());
        session.submit_situation("아파트 화재").await.unwrap();

        session.apply_probe(ProbeReport {
            status: ConnectionStatus::Offline,
            ..ProbeReport::pending()
        });
        let err = session.expand_perspective(Viewpoint::Politics).await.unwrap_err();
        assert!(matches!(err, DirectorError::Offline));
        assert!(session.error().is_none());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_news_analyze_requires_search() {
        let (mut session, api) = session_with(FakeApi::online());

        let err = session.analyze_news().await.unwrap_err();
        assert!(matches!(err, DirectorError::NoNewsArticles));
        assert!(api.calls().is_empty());

        let articles = session.search_news("전세 사기").await.unwrap();
        assert_eq!(articles.len(), 2);

        let analysis = session.analyze_news().await.unwrap();
        assert_eq!(analysis.summary, "요약");
        assert_eq!(api.calls(), vec!["news_search:전세 사기", "news_analyze:2"]);
    }

    #[tokio::test]
    async fn test_empty_search_result_blocks_analysis() {
        let (mut session, api) = session_with(FakeApi {
            articles: vec![],
            ..FakeApi::online()
        });

        session.search_news("없는 주제").await.unwrap();
        let err = session.analyze_news().await.unwrap_err();
        assert!(matches!(err, DirectorError::NoNewsArticles));
        assert_eq!(api.calls(), vec!["news_search:없는 주제"]);
    }

    #[tokio::test]
    async fn test_failed_search_drops_held_articles() {
        let (mut session, _api) = session_with(FakeApi::online());
        session.search_news("전세 사기").await.unwrap();
        session.analyze_news().await.unwrap();

        let failing = Arc::new(FakeApi::failing(502, "네이버 검색 실패"));
        session.api = failing.clone() as Arc<dyn DirectorApi>;
        assert!(session.search_news("다른 주제").await.is_err());
        assert!(session.news_articles().is_none());
        assert!(session.news_analysis().is_none());

        assert!(matches!(
            session.analyze_news().await.unwrap_err(),
            DirectorError::NoNewsArticles
        ));
        assert_eq!(failing.calls(), vec!["news_search:다른 주제"]);
    }

    #[tokio::test]
    async fn test_connection_status_follows_latest_probe() {
        let (mut session, _api) = session_with(FakeApi::online());
        let report = session.test_connection().await;
        assert!(report.is_online());
        assert_eq!(session.api_status(), ConnectionStatus::Online);

        session.apply_probe(ProbeReport {
            status: ConnectionStatus::Offline,
            ..ProbeReport::pending()
        });
        assert_eq!(session.api_status(), ConnectionStatus::Offline);
    }

    #[tokio::test]
    async fn test_loading_flag_visible_while_request_in_flight() {
        let gate = Arc::new(Notify::new());
        let (mut session, _api) = session_with(FakeApi {
            gate: Some(gate.clone()),
            ..FakeApi::online()
        });
        let mut loading = session.watch_loading();

        let task = tokio::spawn(async move {
            let ok = session.submit_situation("세월호 침몰 사고 현장").await.is_ok();
            (session, ok)
        });

        let flags = *loading.wait_for(|f| f.director).await.unwrap();
        assert!(flags.director);
        assert!(!flags.news_search);

        gate.notify_one();
        let (session, ok) = task.await.unwrap();
        assert!(ok);
        assert!(!session.loading().any());
        assert!(!loading.borrow_and_update().director);
    }
}
