use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::context::RecommenderContext;
use super::error::EngineError;
use crate::assembly::{AssemblyConfig, RankedResult, ResultAssembler};
use crate::catalog::AssessmentRecord;
use crate::config::Config;
use crate::constants::{DEFAULT_EMBEDDING_TIMEOUT, DEFAULT_FETCH_TIMEOUT, DEFAULT_JUDGE_MAX_CANDIDATES};
use crate::embedding::embed_with_timeout;
use crate::features::FeatureExtractor;
use crate::query::{JdFetcher, QueryContext, looks_like_url};
use crate::rerank::{
    GenaiJudge, JudgeConfig, JudgeReranker, RerankInput, RerankOutcome, Reranker, RerankerKind,
    RuleReranker, RuleWeights,
};
use crate::retrieval::{CandidateGenerator, GeneratorConfig, RetrievalMode};

/// Tunables of one [`Recommender`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub generator: GeneratorConfig,
    pub assembly: AssemblyConfig,
    pub rule_weights: RuleWeights,
    pub judge: JudgeConfig,
    pub embedding_timeout: Duration,
    /// `None` disables dereferencing URL queries.
    pub fetch_timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            assembly: AssemblyConfig::default(),
            rule_weights: RuleWeights::default(),
            judge: JudgeConfig::default(),
            embedding_timeout: DEFAULT_EMBEDDING_TIMEOUT,
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
        }
    }
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            generator: GeneratorConfig {
                pool_size: config.pool_size,
                ..GeneratorConfig::default()
            },
            judge: JudgeConfig {
                timeout: config.judge_timeout,
                retries: config.judge_retries,
                max_candidates: DEFAULT_JUDGE_MAX_CANDIDATES,
            },
            embedding_timeout: config.embedding_timeout,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.generator.validate()?;
        self.assembly.validate()?;
        self.rule_weights.validate()?;
        Ok(())
    }
}

/// Output of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub query: QueryContext,
    /// Final order, ranks 1..=n.
    pub results: Vec<RankedResult>,
    /// Response records, same order as `results`.
    pub records: Vec<AssessmentRecord>,
    pub retrieval: RetrievalMode,
    pub rerank: RerankOutcome,
}

impl Recommendation {
    pub fn ids(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.id.as_str()).collect()
    }
}

/// query -> analysis -> candidates -> features -> scores -> final list.
pub struct Recommender {
    context: Arc<RecommenderContext>,
    generator: CandidateGenerator,
    extractor: FeatureExtractor,
    reranker: Reranker,
    assembler: ResultAssembler,
    fetcher: Option<JdFetcher>,
    embedding_timeout: Duration,
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("context", &self.context)
            .field("reranker", &self.reranker.kind())
            .finish()
    }
}

impl Recommender {
    pub fn new(
        context: Arc<RecommenderContext>,
        reranker: Reranker,
        config: PipelineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let fetcher = config.fetch_timeout.map(JdFetcher::new).transpose()?;
        Ok(Self {
            context,
            generator: CandidateGenerator::new(config.generator)?,
            extractor: FeatureExtractor::new(),
            reranker,
            assembler: ResultAssembler::new(config.assembly)?,
            fetcher,
            embedding_timeout: config.embedding_timeout,
        })
    }

    /// Builds the configured reranker variant and the pipeline around it.
    pub fn from_config(context: Arc<RecommenderContext>, config: &Config) -> Result<Self, EngineError> {
        let pipeline = PipelineConfig::from_config(config);
        let rules = RuleReranker::new(pipeline.rule_weights.clone())?;
        let reranker = match config.reranker {
            RerankerKind::Learned => Reranker::learned_or_rules(config.model_path.as_deref(), rules)?,
            RerankerKind::Rules => Reranker::Rules(rules),
            RerankerKind::Judge => Reranker::Judge(JudgeReranker::new(
                Arc::new(GenaiJudge::new(config.judge_model.clone())),
                rules,
                pipeline.judge.clone(),
            )),
        };
        Self::new(context, reranker, pipeline)
    }

    pub fn context(&self) -> &RecommenderContext {
        &self.context
    }

    pub fn reranker(&self) -> &Reranker {
        &self.reranker
    }

    pub fn is_ready(&self) -> bool {
        self.context.is_ready()
    }

    /// Never fails: external-service failures degrade to fallbacks, and an
    /// empty pool yields an empty list.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn recommend(&self, query: &str) -> Recommendation {
        let text = self.resolve_input(query).await;
        let ctx = self.context.analyzer().analyze(&text);
        let catalog = self.context.catalog();

        let query_vector = self.embed(&ctx).await;
        let pool = self
            .generator
            .generate(&ctx, catalog, self.context.index(), query_vector.as_deref())
            .await;

        let items = self.extractor.extract_pool(&ctx, &pool, catalog);
        let reranked = self
            .reranker
            .rerank(&RerankInput {
                query: &ctx,
                items: &items,
                catalog,
            })
            .await;

        let results = self.assembler.assemble(&ctx, &reranked.scored, catalog);
        let records = results
            .iter()
            .filter_map(|r| catalog.get(&r.id))
            .map(AssessmentRecord::from)
            .collect();

        debug!(
            pool = pool.len(),
            results = results.len(),
            hybrid = pool.mode.is_hybrid(),
            reranker = reranked.outcome.as_str(),
            "Recommendation complete"
        );

        Recommendation {
            query: ctx,
            results,
            records,
            retrieval: pool.mode,
            rerank: reranked.outcome,
        }
    }

    /// Page text for URL queries when fetching succeeds, the input otherwise.
    async fn resolve_input(&self, query: &str) -> String {
        if !looks_like_url(query) {
            return query.to_string();
        }
        match &self.fetcher {
            Some(fetcher) => fetcher
                .fetch(query)
                .await
                .unwrap_or_else(|| query.to_string()),
            None => query.to_string(),
        }
    }

    async fn embed(&self, ctx: &QueryContext) -> Option<Vec<f32>> {
        let embedder = self.context.embedder()?;
        if ctx.expanded_text.is_empty() {
            return None;
        }
        match embed_with_timeout(embedder, &ctx.expanded_text, self.embedding_timeout).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(embedder = embedder.name(), error = %e, "Query embedding failed; using lexical ranking only");
                None
            }
        }
    }
}
