/// This module reads the compiler's output: the per-contract artifacts that
/// hold the ABI and creation bytecode, and the build info that explorers need
/// to verify a deployment.
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use ethers::{abi::Abi, types::Bytes};
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::scanner::ConnectorDescriptor;

/// Compiles the contracts of the project at `project_root`.
pub fn compile<P: AsRef<Path>>(project_root: P) -> Result<()> {
    info!("compiling contracts");
    let status = Command::new("npx")
        .args(["hardhat", "compile"])
        .current_dir(project_root)
        .status()
        .wrap_err("failed to run the hardhat compiler")?;
    if !status.success() {
        return Err(eyre!("contract compilation failed with {}", status));
    }
    Ok(())
}

/// Hardhat writes the creation bytecode as a hex string while Foundry nests it
/// in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(Bytes),
    Object { object: Bytes },
}

impl From<RawBytecode> for Bytes {
    fn from(r: RawBytecode) -> Self {
        match r {
            RawBytecode::Hex(bytes) | RawBytecode::Object { object: bytes } => bytes,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    source_name: Option<String>,
    abi: Abi,
    bytecode: RawBytecode,
}

/// A compiled contract.
#[derive(Clone, Debug)]
pub struct Artifact {
    pub contract_name: String,
    /// The source unit that declares the contract, e.g.
    /// `contracts/mainnet/connectors/aave/v2/main.sol`.
    pub source_name: Option<String>,
    pub abi: Abi,
    pub bytecode: Bytes,
    pub path: PathBuf,
}

impl Artifact {
    /// Reads an artifact file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .wrap_err_with(|| format!("missing artifact {}", path.display()))?;
        let raw: RawArtifact = serde_json::from_reader(file)
            .wrap_err_with(|| format!("malformed artifact {}", path.display()))?;
        let contract_name = match raw.contract_name {
            Some(name) => name,
            None => file_stem(path)?,
        };
        Ok(Self {
            contract_name,
            source_name: raw.source_name,
            abi: raw.abi,
            bytecode: raw.bytecode.into(),
            path: path.to_path_buf(),
        })
    }

    /// The fully qualified name explorers expect, `<source>:<contract>`.
    pub fn qualified_name(&self) -> String {
        match &self.source_name {
            Some(source) => format!("{}:{}", source, self.contract_name),
            None => self.contract_name.clone(),
        }
    }
}

/// The compiler input and output of a Hardhat build.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_version: String,
    pub solc_long_version: String,
    /// The standard JSON input given to solc.
    pub input: Value,
    #[serde(default)]
    pub output: Value,
}

impl BuildInfo {
    /// The metadata solc emitted for a contract.
    pub fn metadata(&self, source_name: &str, contract_name: &str) -> Option<String> {
        self.output
            .get("contracts")?
            .get(source_name)?
            .get(contract_name)?
            .get("metadata")?
            .as_str()
            .map(str::to_string)
    }

    /// The content of every source file that went into the build.
    pub fn sources(&self) -> Vec<(String, String)> {
        let mut sources = self
            .input
            .get("sources")
            .and_then(Value::as_object)
            .map(|sources| {
                sources
                    .iter()
                    .filter_map(|(path, source)| {
                        let content = source.get("content")?.as_str()?;
                        Some((path.clone(), content.to_string()))
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        sources.sort();
        sources
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: PathBuf,
}

/// The artifacts directory of a compiled project.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Loads the artifact of a scanned connector. Hardhat mirrors the source
    /// tree, so the artifact lives at `<root>/<source path>/<name>.json`.
    pub fn connector(&self, connector: &ConnectorDescriptor) -> Result<Artifact> {
        self.load_at(&connector.source_path, &connector.name)
    }

    /// Searches the whole store for the artifact of a contract name.
    pub fn find(&self, name: &str) -> Result<Artifact> {
        let mut found = Vec::new();
        collect_artifacts(&self.root, name, &mut found)?;
        match found.len() {
            0 => Err(eyre!(
                "no artifact for {} under {}",
                name,
                self.root.display()
            )),
            1 => Artifact::load(&found[0]),
            _ => Err(eyre!(
                "multiple artifacts for {}:\n{}",
                name,
                found
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join("\n")
            )),
        }
    }

    /// Reads the build info an artifact was produced by, following the
    /// `.dbg.json` file Hardhat writes next to every artifact.
    pub fn build_info(&self, artifact: &Artifact) -> Result<BuildInfo> {
        let dbg_path = artifact
            .path
            .with_file_name(format!("{}.dbg.json", artifact.contract_name));
        let dbg: DebugFile = serde_json::from_reader(
            fs::File::open(&dbg_path)
                .wrap_err_with(|| format!("missing debug file {}", dbg_path.display()))?,
        )?;
        let build_info_path = match artifact.path.parent() {
            Some(dir) => dir.join(&dbg.build_info),
            None => dbg.build_info,
        };
        let file = fs::File::open(&build_info_path)
            .wrap_err_with(|| format!("missing build info {}", build_info_path.display()))?;
        Ok(serde_json::from_reader(file)?)
    }

    fn load_at(&self, source_path: &Path, name: &str) -> Result<Artifact> {
        Artifact::load(self.root.join(source_path).join(format!("{}.json", name)))
    }
}

fn collect_artifacts(dir: &Path, name: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    let file_name = format!("{}.json", name);
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            // If the artifact is the target, add it to the list.
            if path.file_name().and_then(|n| n.to_str()) == Some(file_name.as_str()) {
                found.push(path);
            }
        } else {
            collect_artifacts(&path, name, found)?;
        }
    }
    Ok(())
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| eyre!("invalid artifact path {}", path.display()))
}
