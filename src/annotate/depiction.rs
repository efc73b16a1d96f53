use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures_util::stream::{self, StreamExt};
use indexmap::IndexMap;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};
use url::Url;

use crate::errors::{AnnotationError, AnnotationResult};
use crate::graph::{Node, NodeKind, PathwayGraph};

const SVG_DATA_URI: &str = "data:image/svg+xml;base64,";
pub const DEFAULT_QUERY_PARAMETER: &str = "inchi";

/// Produces an SVG document for a chemical structure given as InChI
#[async_trait]
pub trait StructureRenderer: Send + Sync {
    async fn render(&self, inchi: &str) -> AnnotationResult<String>;
}

/// Runs an external program: InChI on stdin, SVG on stdout
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a command line on whitespace, the first word naming the program
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self::new(program, words.collect()))
    }
}

#[async_trait]
impl StructureRenderer for CommandRenderer {
    async fn render(&self, inchi: &str) -> AnnotationResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Input is fed while output is drained, a renderer may answer or
        // exit before it has read everything.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(inchi.as_bytes()).await {
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output?;
        if !output.status.success() {
            return Err(AnnotationError::RendererFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        fed?;
        non_empty_svg(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Queries a depiction service: `GET <endpoint>?<parameter>=<inchi>`
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: reqwest::Client,
    endpoint: Url,
    parameter: String,
}

impl HttpRenderer {
    pub fn new(endpoint: &str, parameter: &str) -> AnnotationResult<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            endpoint: Url::parse(endpoint)?,
            parameter: parameter.to_string(),
        })
    }

    pub fn request_url(&self, inchi: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(&self.parameter, inchi);
        url
    }
}

#[async_trait]
impl StructureRenderer for HttpRenderer {
    async fn render(&self, inchi: &str) -> AnnotationResult<String> {
        let response = self
            .client
            .get(self.request_url(inchi))
            .send()
            .await?
            .error_for_status()?;
        non_empty_svg(response.text().await?)
    }
}

fn non_empty_svg(svg: String) -> AnnotationResult<String> {
    if svg.trim().is_empty() {
        Err(AnnotationError::EmptyDepiction)
    } else {
        Ok(svg)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepictionOptions {
    pub timeout: Duration,
    pub max_concurrency: usize,
}

impl Default for DepictionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_concurrency: 4,
        }
    }
}

/// Embeds an SVG document as a base64 data URI. Namespace prefixes
/// (`svg:rect`) are dropped so browsers render it inline.
pub fn svg_data_uri(svg: &str) -> String {
    format!("{}{}", SVG_DATA_URI, STANDARD.encode(svg.replace("svg:", "")))
}

pub async fn depict<R>(renderer: &R, inchi: &str, timeout: Duration) -> AnnotationResult<String>
where
    R: StructureRenderer + ?Sized,
{
    match tokio::time::timeout(timeout, renderer.render(inchi)).await {
        Ok(svg) => svg.map(|svg| svg_data_uri(&svg)),
        Err(_) => Err(AnnotationError::Timeout(timeout)),
    }
}

/// Attaches a depiction to every chemical that has an InChI.
///
/// Each distinct InChI is rendered once. A failed or timed out rendering
/// leaves `svg` null for the nodes sharing that InChI.
pub async fn annotate_depictions<R>(
    mut graph: PathwayGraph,
    renderer: &R,
    options: &DepictionOptions,
) -> PathwayGraph
where
    R: StructureRenderer + ?Sized,
{
    let mut jobs: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (index, node) in graph.nodes.iter().enumerate() {
        if let Some(inchi) = node.as_chemical().and_then(|c| c.inchi.as_ref()) {
            jobs.entry(inchi.clone()).or_default().push(index);
        }
    }
    debug!("Rendering {} distinct structure(s)", jobs.len());

    let timeout = options.timeout;
    let results: Vec<(Vec<usize>, AnnotationResult<String>)> = stream::iter(jobs)
        .map(|(inchi, indices)| async move { (indices, depict(renderer, &inchi, timeout).await) })
        .buffer_unordered(options.max_concurrency.max(1))
        .collect()
        .await;

    let mut failed = 0;
    for (indices, result) in results {
        if result.is_err() {
            failed += 1;
        }
        for index in indices {
            let Some(Node { id, kind, .. }) = graph.nodes.get_mut(index) else {
                continue;
            };
            if let NodeKind::Chemical(chemical) = kind {
                match &result {
                    Ok(uri) => chemical.svg = Some(uri.clone()),
                    Err(e) => {
                        warn!("No depiction for {}: {}", id, e);
                        chemical.svg = None;
                    }
                }
            }
        }
    }

    info!("Depictions rendered, {} structure(s) failed", failed);
    graph
}
