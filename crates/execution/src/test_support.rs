//! Scripted collaborators shared by the unit tests.

use crate::{
    AgentWork, AutonomousAgent, EngineConfig, InMemoryMessageService, InMemoryRunModel, WorkContext,
};
use async_trait::async_trait;
use autoagent_api::{AgentApi, ApiRequest, TaskAnalysis};
use autoagent_core::{AgentLifecycle, ApiError, CompletedTask, ModelSettings};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

type AnalyzeHook = Arc<dyn Fn(&str) + Send + Sync>;
type StartHook = Arc<dyn Fn() + Send + Sync>;

/// Gateway answering from a script.
///
/// Failures are queued per key: `"start"`, `"summarize"`, or a task name.
#[derive(Default)]
pub struct ScriptedApi {
    tasks: Vec<String>,
    analyses: HashMap<String, TaskAnalysis>,
    failures: Mutex<HashMap<String, VecDeque<ApiError>>>,
    analyzed: Mutex<Vec<String>>,
    start_calls: AtomicUsize,
    on_analyze: Mutex<Option<AnalyzeHook>>,
    on_start: Mutex<Option<StartHook>>,
}

impl ScriptedApi {
    pub fn new<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tasks: tasks.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_analysis(mut self, task: &str, analysis: TaskAnalysis) -> Self {
        self.analyses.insert(task.to_string(), analysis);
        self
    }

    pub fn failing(self, key: &str, errors: Vec<ApiError>) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(key.to_string(), errors.into());
        self
    }

    pub fn on_analyze(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        *self.on_analyze.lock().unwrap() = Some(Arc::new(hook));
    }

    pub fn on_start(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_start.lock().unwrap() = Some(Arc::new(hook));
    }

    /// Every task passed to `analyze_task`, failed calls included.
    pub fn analyzed(&self) -> Vec<String> {
        self.analyzed.lock().unwrap().clone()
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    fn next_failure(&self, key: &str) -> Option<ApiError> {
        self.failures
            .lock()
            .unwrap()
            .get_mut(key)
            .and_then(VecDeque::pop_front)
    }
}

#[async_trait]
impl AgentApi for ScriptedApi {
    async fn get_initial_tasks(&self, _request: &ApiRequest<'_>) -> Result<Vec<String>, ApiError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        let hook = self.on_start.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook();
        }
        match self.next_failure("start") {
            Some(err) => Err(err),
            None => Ok(self.tasks.clone()),
        }
    }

    async fn analyze_task(
        &self,
        _request: &ApiRequest<'_>,
        task: &str,
    ) -> Result<TaskAnalysis, ApiError> {
        self.analyzed.lock().unwrap().push(task.to_string());
        let hook = self.on_analyze.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook(task);
        }
        if let Some(err) = self.next_failure(task) {
            return Err(err);
        }
        Ok(self
            .analyses
            .get(task)
            .cloned()
            .unwrap_or_else(|| TaskAnalysis::new(format!("Result of {task}"))))
    }

    async fn summarize(
        &self,
        _request: &ApiRequest<'_>,
        results: &[CompletedTask],
    ) -> Result<String, ApiError> {
        if let Some(err) = self.next_failure("summarize") {
            return Err(err);
        }
        let tasks: Vec<&str> = results.iter().map(|c| c.task.as_str()).collect();
        Ok(format!("{} result(s): {}", results.len(), tasks.join(", ")))
    }
}

pub fn context(
    api: Arc<ScriptedApi>,
) -> (WorkContext, Arc<InMemoryRunModel>, Arc<InMemoryMessageService>) {
    context_with_config(api, EngineConfig::default())
}

pub fn context_with_config(
    api: Arc<ScriptedApi>,
    config: EngineConfig,
) -> (WorkContext, Arc<InMemoryRunModel>, Arc<InMemoryMessageService>) {
    let model = Arc::new(InMemoryRunModel::new("Write a report"));
    let messages = Arc::new(InMemoryMessageService::new());
    let ctx = WorkContext {
        model: model.clone(),
        messages: messages.clone(),
        api,
        settings: ModelSettings::default(),
        session: None,
        config,
    };
    (ctx, model, messages)
}

pub struct Harness {
    pub agent: AutonomousAgent,
    pub api: Arc<ScriptedApi>,
    pub model: Arc<InMemoryRunModel>,
    pub messages: Arc<InMemoryMessageService>,
}

pub fn agent(api: ScriptedApi) -> Harness {
    let api = Arc::new(api);
    let model = Arc::new(InMemoryRunModel::new("Write a report"));
    let messages = Arc::new(InMemoryMessageService::new());
    let agent = AutonomousAgent::new(
        model.clone(),
        messages.clone(),
        ModelSettings::default(),
        api.clone(),
        None,
    );
    Harness {
        agent,
        api,
        model,
        messages,
    }
}

/// Work item failing with a scripted sequence of errors, then succeeding.
pub struct FlakyWork {
    errors: VecDeque<ApiError>,
    thinking: Option<watch::Receiver<bool>>,
    veto: bool,
    stop_on_run: bool,
    pub runs: u32,
    pub thinking_seen: Vec<bool>,
    pub errors_seen: u32,
}

impl FlakyWork {
    pub fn new(errors: Vec<ApiError>) -> Self {
        Self {
            errors: errors.into(),
            thinking: None,
            veto: false,
            stop_on_run: false,
            runs: 0,
            thinking_seen: Vec::new(),
            errors_seen: 0,
        }
    }

    /// Record the busy indicator at the start of every run.
    pub fn observing(mut self, thinking: watch::Receiver<bool>) -> Self {
        self.thinking = Some(thinking);
        self
    }

    pub fn vetoing(mut self) -> Self {
        self.veto = true;
        self
    }

    pub fn stopping_on_run(mut self) -> Self {
        self.stop_on_run = true;
        self
    }
}

#[async_trait]
impl AgentWork for FlakyWork {
    fn describe(&self) -> String {
        "flaky".to_string()
    }

    async fn run(&mut self, ctx: &WorkContext) -> Result<(), ApiError> {
        self.runs += 1;
        if let Some(thinking) = &self.thinking {
            self.thinking_seen.push(*thinking.borrow());
        }
        if self.stop_on_run {
            ctx.model.set_lifecycle(AgentLifecycle::Stopped);
        }
        match self.errors.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn conclude(&mut self, _ctx: &WorkContext) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_error(&mut self, _ctx: &WorkContext, _error: &ApiError) -> bool {
        self.errors_seen += 1;
        !self.veto
    }
}

/// Work item that chains `remaining` successors, counting conclusions.
pub struct ChainWork {
    remaining: u32,
    fail_conclude: bool,
    pub concludes: Arc<AtomicUsize>,
}

impl ChainWork {
    pub fn new(remaining: u32) -> Self {
        Self {
            remaining,
            fail_conclude: false,
            concludes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_conclude: true,
            ..Self::new(0)
        }
    }
}

#[async_trait]
impl AgentWork for ChainWork {
    fn describe(&self) -> String {
        format!("chain {}", self.remaining)
    }

    async fn run(&mut self, _ctx: &WorkContext) -> Result<(), ApiError> {
        Ok(())
    }

    async fn conclude(&mut self, _ctx: &WorkContext) -> anyhow::Result<()> {
        self.concludes.fetch_add(1, Ordering::SeqCst);
        if self.fail_conclude {
            anyhow::bail!("conclusion broke");
        }
        Ok(())
    }

    fn next(&mut self) -> anyhow::Result<Option<Box<dyn AgentWork>>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        Ok(Some(Box::new(ChainWork {
            remaining: self.remaining - 1,
            fail_conclude: false,
            concludes: self.concludes.clone(),
        })))
    }
}
