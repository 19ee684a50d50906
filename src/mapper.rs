/// Read mapper adapters producing a SAM alignment stream
use crate::error::Error;
use log::{debug, info};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Number of standard deviations either side of the insert size accepted
/// by the mapper as a concordant pair.
const INSERT_WINDOW_SDS: u32 = 3;

/// Inputs for one mapping run.
#[derive(Debug, Clone)]
pub struct MappingRequest {
    pub assembly: PathBuf,
    pub left: Vec<PathBuf>,
    pub right: Vec<PathBuf>,
    pub unpaired: Vec<PathBuf>,
    pub insert_size: u32,
    pub insert_sd: u32,
    pub threads: usize,
    /// Path prefix for the index and SAM the mapper writes
    pub work_prefix: PathBuf,
}

impl MappingRequest {
    /// Smallest fragment length accepted as a proper pair.
    pub fn min_insert(&self) -> u32 {
        self.insert_size
            .saturating_sub(INSERT_WINDOW_SDS.saturating_mul(self.insert_sd))
    }

    /// Largest fragment length accepted as a proper pair.
    pub fn max_insert(&self) -> u32 {
        self.insert_size
            .saturating_add(INSERT_WINDOW_SDS.saturating_mul(self.insert_sd))
    }

    /// Where the mapper's SAM output goes.
    pub fn sam_path(&self) -> PathBuf {
        let mut path = self.work_prefix.clone().into_os_string();
        path.push(".sam");
        PathBuf::from(path)
    }
}

/// Something that turns reads plus an assembly into a SAM file.
pub trait ReadMapper {
    /// Map the reads and return the path of the SAM stream. Mates of a
    /// pair must be written next to each other.
    fn map_reads(&self, request: &MappingRequest) -> Result<PathBuf, Error>;
}

/// Alignments that already exist on disk.
#[derive(Debug, Clone)]
pub struct PrecomputedAlignments {
    path: PathBuf,
}

impl PrecomputedAlignments {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReadMapper for PrecomputedAlignments {
    fn map_reads(&self, _request: &MappingRequest) -> Result<PathBuf, Error> {
        info!("Using pre-computed alignments {}", self.path.display());
        Ok(self.path.clone())
    }
}

/// bowtie2 driven as an external process.
#[derive(Debug, Clone)]
pub struct Bowtie2 {
    command: String,
    build_command: String,
}

impl Bowtie2 {
    /// `command` is the mapper executable; the index builder is
    /// `<command>-build`.
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        let build_command = format!("{command}-build");
        Self {
            command,
            build_command,
        }
    }

    /// Arguments for building the assembly index.
    pub fn build_args(&self, request: &MappingRequest) -> Vec<OsString> {
        vec![
            OsString::from("--threads"),
            OsString::from(request.threads.to_string()),
            request.assembly.clone().into_os_string(),
            request.work_prefix.clone().into_os_string(),
        ]
    }

    /// Arguments for mapping the reads.
    pub fn map_args(&self, request: &MappingRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--reorder".into(),
            "-I".into(),
            request.min_insert().to_string().into(),
            "-X".into(),
            request.max_insert().to_string().into(),
            "-p".into(),
            request.threads.to_string().into(),
            "-x".into(),
            request.work_prefix.clone().into_os_string(),
        ];

        if !request.left.is_empty() && !request.right.is_empty() {
            args.push("-1".into());
            args.push(join_paths(&request.left));
            args.push("-2".into());
            args.push(join_paths(&request.right));
        }
        if !request.unpaired.is_empty() {
            args.push("-U".into());
            args.push(join_paths(&request.unpaired));
        }

        args.push("-S".into());
        args.push(request.sam_path().into_os_string());
        args
    }

    fn run(program: &str, args: &[OsString]) -> Result<(), Error> {
        debug!("Running {} {:?}", program, args);
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::Mapper(format!("failed to start {program}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Mapper(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl ReadMapper for Bowtie2 {
    fn map_reads(&self, request: &MappingRequest) -> Result<PathBuf, Error> {
        let sam_path = request.sam_path();
        if is_non_empty(&sam_path) {
            info!("Reusing existing alignments {}", sam_path.display());
            return Ok(sam_path);
        }

        info!("Building {} index for {}", self.command, request.assembly.display());
        Self::run(&self.build_command, &self.build_args(request))?;

        info!("Mapping reads with {}", self.command);
        Self::run(&self.command, &self.map_args(request))?;

        Ok(sam_path)
    }
}

/// bowtie2 takes several read files as one comma-separated argument.
fn join_paths(paths: &[PathBuf]) -> OsString {
    let mut joined = OsString::new();
    for (i, path) in paths.iter().enumerate() {
        if i > 0 {
            joined.push(",");
        }
        joined.push(path);
    }
    joined
}

fn is_non_empty(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.len() > 0)
}
