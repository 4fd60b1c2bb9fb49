use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FAKE_GIT: &str = r#"#!/bin/sh
# clone -- <url> <dest>
touch "$(dirname "$4")/git-called"
case "$3" in
  *missing*) echo "fatal: repository '$3' not found" >&2; exit 128 ;;
esac
mkdir -p "$4"
"#;

pub const FAKE_PHPMD: &str = r#"#!/bin/sh
printf '%s\n' "$@" > args.log
report=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--reportfile" ]; then report="$2"; fi
  shift
done
echo "<pmd>" > "$report"
echo "  <file name=\"src/A.php\"/>" >> "$report"
echo "</pmd>" >> "$report"
echo "phpmd finished"
exit ${FAKE_PHPMD_EXIT:-0}
"#;

pub const FAKE_GRADLE: &str = r#"#!/bin/sh
printf '%s\n' "$@" > args.log
mkdir -p build/reports/checkstyle
echo '<checkstyle version="10"/>' > build/reports/checkstyle/main.xml
"#;

pub const FAKE_CONVERTER: &str = r#"#!/bin/sh
out=""
to=""
while [ $# -gt 0 ]; do
  case "$1" in
    --output) out="$2" ;;
    --to) to="$2" ;;
  esac
  shift
done
printf '{"format":"%s"}\n' "$to" > "$out"
"#;

pub struct TestEnv {
    tmp: TempDir,
    pub workspace: PathBuf,
    pub report: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let bin = tmp.path().join("bin");
        fs::create_dir_all(&bin).expect("create bin dir");
        for (name, body) in [
            ("git", FAKE_GIT),
            ("phpmd", FAKE_PHPMD),
            ("gradle", FAKE_GRADLE),
            ("report-convert", FAKE_CONVERTER),
        ] {
            write_script(&bin.join(name), body);
        }
        let workspace = tmp.path().join("workspace");
        let report = tmp.path().join("phpmd.xml");
        Self { tmp, workspace, report }
    }

    pub fn bin(&self, name: &str) -> String {
        self.tmp.path().join("bin").join(name).to_str().expect("utf8 path").to_string()
    }

    pub fn git_called(&self) -> bool { self.tmp.path().join("git-called").exists() }

    pub fn cmd(&self, tool: &str, data: &str) -> Command {
        let mut cmd = cargo_bin_cmd!("lintrelay");
        cmd.env_clear()
            .env("PATH", std::env::var("PATH").unwrap_or_default())
            .env("RUST_LOG", "off")
            .env("CO_DATA", data)
            .arg("--tool")
            .arg(tool)
            .arg("--workspace")
            .arg(&self.workspace)
            .arg("--git-bin")
            .arg(self.bin("git"))
            .arg("--converter-bin")
            .arg(self.bin("report-convert"))
            .arg("--timeout-secs")
            .arg("60");
        match tool {
            "phpmd" => {
                cmd.arg("--tool-bin").arg(self.bin("phpmd")).arg("--report-file").arg(&self.report);
            }
            _ => {
                cmd.arg("--tool-bin").arg(self.bin("gradle"));
            }
        }
        cmd
    }

    pub fn args_log(&self) -> Vec<String> {
        fs::read_to_string(self.workspace.join("args.log"))
            .expect("tool wrote args.log")
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write fake script");
    let mut perms = fs::metadata(path).expect("stat script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod script");
}
