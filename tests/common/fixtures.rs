use image::{ImageBuffer, Rgb};
use screwsort::config::{ClassifierConfig, SetupConfig};
use screwsort::setup::SetupError;
use screwsort::setup::environment::PackageManager;
use screwsort::{ImageTensor, Scorer};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};

/// Writes a solid-color PNG into `dir` and returns its path.
pub fn create_test_image(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    let img = ImageBuffer::from_fn(64, 48, |_, _| Rgb(color));
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}

/// Creates a project layout in a temp dir: test images dir plus output dir paths.
/// Returns the config and the temp directory (which must be kept alive).
pub fn create_test_layout() -> (ClassifierConfig, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let config = ClassifierConfig::rooted_at(dir.path());
    std::fs::create_dir_all(&config.test_dir).expect("Failed to create test dir");
    (config, dir)
}

/// Sorted file names directly inside `dir`
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Returns queued probabilities in call order (files are visited sorted by name)
pub struct SequenceScorer {
    probabilities: RefCell<VecDeque<f32>>,
}

impl SequenceScorer {
    pub fn new(probabilities: &[f32]) -> Self {
        Self {
            probabilities: RefCell::new(probabilities.iter().copied().collect()),
        }
    }
}

impl Scorer for SequenceScorer {
    fn score(&self, _input: &ImageTensor) -> anyhow::Result<f32> {
        self.probabilities
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No more scores queued"))
    }
}

/// Scores by the red channel of the top-left pixel: red / 255
pub struct RedChannelScorer;

impl Scorer for RedChannelScorer {
    fn score(&self, input: &ImageTensor) -> anyhow::Result<f32> {
        let red = input.get(0, 0, 2) + screwsort::classify::preprocessing::BGR_MEANS[2];
        Ok((red / 255.0).clamp(0.0, 1.0))
    }
}

/// Records every call; creates the environment dir and fails installs of `broken`
#[derive(Default)]
pub struct FakePackageManager {
    pub broken: Vec<String>,
    pub calls: RefCell<Vec<String>>,
}

impl FakePackageManager {
    pub fn with_broken(broken: &[&str]) -> Self {
        Self {
            broken: broken.iter().map(|s| s.to_string()).collect(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PackageManager for FakePackageManager {
    fn create_environment(&self, dir: &Path) -> Result<(), SetupError> {
        self.calls.borrow_mut().push("create".to_string());
        std::fs::create_dir_all(dir)?;
        Ok(())
    }

    fn upgrade_installer(&self) -> Result<(), SetupError> {
        self.calls.borrow_mut().push("upgrade".to_string());
        Ok(())
    }

    fn install(&self, package: &str) -> Result<(), SetupError> {
        self.calls.borrow_mut().push(format!("install {}", package));
        if self.broken.iter().any(|b| b == package) {
            Err(SetupError::Process(format!("no such package: {}", package)))
        } else {
            Ok(())
        }
    }
}

/// Setup config rooted in `root` with the given package list and dataset URL
pub fn make_setup_config(root: &Path, requirements: &[&str], data_url: &str) -> SetupConfig {
    let mut config = SetupConfig::rooted_at(root);
    config.requirements = requirements.iter().map(|s| s.to_string()).collect();
    config.data_url = data_url.to_string();
    config
}

/// In-memory ZIP with the given entries
pub fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, zip::write::FileOptions::default())
            .expect("Failed to start zip entry");
        writer.write_all(contents).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip").into_inner()
}

/// Serves a single HTTP response on a local port and returns its URL
pub fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("No local address");

    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let header = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/zip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                body.len()
            );
            stream.write_all(header.as_bytes()).ok();
            stream.write_all(&body).ok();
            stream.flush().ok();
        }
    });

    format!("http://{}/anomaly_dataset.zip", addr)
}

/// A URL nothing listens on
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);
    format!("http://{}/anomaly_dataset.zip", addr)
}
