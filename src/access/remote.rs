//! Repository access through an agent process on the repository's host.
//!
//! The agent is the `agent` subcommand of this binary, started through a
//! launcher prefix such as `ssh build-agent-3 branch-devs`.

use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use crate::access::protocol::{read_message, write_message, Request, Response};
use crate::access::{AccessError, RepositoryAccessor};
use crate::data::Commit;
use crate::git::BranchRef;

/// Request/response conversation with an agent over any byte stream.
pub struct Session<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session over the given streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Waits for the agent to report that its repository is open.
    pub fn handshake(&mut self) -> Result<(), AccessError> {
        match self.receive()? {
            Response::Ready => Ok(()),
            Response::Error { message } => Err(AccessError::Remote(message)),
            other => Err(unexpected(&other)),
        }
    }

    /// Sends one request and returns its response.
    pub fn call(&mut self, request: &Request) -> Result<Response, AccessError> {
        write_message(&mut self.writer, request)?;
        match self.receive()? {
            Response::Error { message } => Err(AccessError::Remote(message)),
            response => Ok(response),
        }
    }

    fn receive(&mut self) -> Result<Response, AccessError> {
        read_message(&mut self.reader)?
            .ok_or_else(|| AccessError::Protocol("agent closed the connection".to_string()))
    }
}

impl<R: BufRead, W: Write> RepositoryAccessor for Session<R, W> {
    fn branch_refs_containing(&mut self, revision: &str) -> Result<Vec<BranchRef>, AccessError> {
        let request = Request::BranchesContaining {
            revision: revision.to_string(),
        };
        match self.call(&request)? {
            Response::Branches { branches } => Ok(branches),
            other => Err(unexpected(&other)),
        }
    }

    fn commits_in_range(&mut self, range: &str) -> Result<Vec<Commit>, AccessError> {
        let request = Request::CommitsInRange {
            range: range.to_string(),
        };
        match self.call(&request)? {
            Response::Commits { commits } => Ok(commits),
            other => Err(unexpected(&other)),
        }
    }
}

fn unexpected(response: &Response) -> AccessError {
    AccessError::Protocol(format!("unexpected response: {response:?}"))
}

/// Accessor backed by an agent child process.
///
/// Dropping it closes the agent's input and waits for the process to exit.
pub struct RemoteAccessor {
    child: Child,
    session: Option<Session<BufReader<ChildStdout>, ChildStdin>>,
}

impl RemoteAccessor {
    /// Starts `launcher... agent <path>` and waits for it to become ready.
    ///
    /// The path is passed as a single argument without quoting. A launcher
    /// that goes through a remote shell, such as `ssh host branch-devs`,
    /// re-splits it there, so paths containing whitespace or shell
    /// metacharacters are not supported through such launchers; a warning is
    /// logged when one is used.
    pub fn spawn(launcher: &[String], path: &Path) -> Result<Self, AccessError> {
        let (program, launcher_args) = launcher.split_first().ok_or_else(|| {
            AccessError::Transport(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty agent command",
            ))
        })?;

        if !launcher_args.is_empty() && !is_shell_safe(path) {
            warn!(
                path = %path.display(),
                "Repository path may be split by the agent launcher's shell"
            );
        }

        debug!(program, path = %path.display(), "Starting repository agent");
        let mut child = Command::new(program)
            .args(launcher_args)
            .arg("agent")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let mut accessor = Self {
            child,
            session: None,
        };

        let (Some(stdin), Some(stdout)) = (stdin, stdout) else {
            return Err(AccessError::Protocol(
                "agent process has no standard streams".to_string(),
            ));
        };
        let mut session = Session::new(BufReader::new(stdout), stdin);
        session.handshake()?;
        accessor.session = Some(session);

        Ok(accessor)
    }

    fn session(&mut self) -> Result<&mut Session<BufReader<ChildStdout>, ChildStdin>, AccessError> {
        self.session
            .as_mut()
            .ok_or_else(|| AccessError::Protocol("agent session is closed".to_string()))
    }
}

impl RepositoryAccessor for RemoteAccessor {
    fn branch_refs_containing(&mut self, revision: &str) -> Result<Vec<BranchRef>, AccessError> {
        self.session()?.branch_refs_containing(revision)
    }

    fn commits_in_range(&mut self, range: &str) -> Result<Vec<Commit>, AccessError> {
        self.session()?.commits_in_range(range)
    }
}

impl Drop for RemoteAccessor {
    fn drop(&mut self) {
        // Closing stdin ends the agent's request loop.
        drop(self.session.take());
        match self.child.wait() {
            Ok(status) if !status.success() => warn!(%status, "Repository agent exited with failure"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Failed to wait for repository agent"),
        }
    }
}

/// Whether `path` survives word splitting by a POSIX shell unchanged.
fn is_shell_safe(path: &Path) -> bool {
    path.to_str().is_some_and(|text| {
        !text.is_empty()
            && text
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "/._-+,:@%=".contains(c))
    })
}

/// Agent side: answers requests from `reader` on `writer` until end of input.
///
/// `opened` is the result of opening the repository; a failure is reported to
/// the client as the first message and ends the conversation.
pub fn serve<A, R, W>(opened: Result<A, AccessError>, reader: R, mut writer: W) -> Result<(), AccessError>
where
    A: RepositoryAccessor,
    R: BufRead,
    W: Write,
{
    let mut accessor = match opened {
        Ok(accessor) => {
            write_message(&mut writer, &Response::Ready)?;
            accessor
        }
        Err(e) => {
            write_message(
                &mut writer,
                &Response::Error {
                    message: e.to_string(),
                },
            )?;
            return Ok(());
        }
    };

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle(&mut accessor, request),
            Err(e) => Response::Error {
                message: format!("malformed request: {e}"),
            },
        };
        write_message(&mut writer, &response)?;
    }

    Ok(())
}

fn handle<A: RepositoryAccessor>(accessor: &mut A, request: Request) -> Response {
    let result = match request {
        Request::BranchesContaining { revision } => accessor
            .branch_refs_containing(&revision)
            .map(|branches| Response::Branches { branches }),
        Request::CommitsInRange { range } => accessor
            .commits_in_range(&range)
            .map(|commits| Response::Commits { commits }),
    };

    result.unwrap_or_else(|e| Response::Error {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeRepository;
    use std::io::Cursor;

    fn serve_to_string(opened: Result<FakeRepository, AccessError>, input: &str) -> String {
        let mut output = Vec::new();
        serve(opened, Cursor::new(input.to_string()), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn serve_answers_each_request() {
        let repo = FakeRepository::new().with_branches("c1", &["origin/main"]);
        let output = serve_to_string(
            Ok(repo),
            "{\"type\":\"branches_containing\",\"revision\":\"c1\"}\n",
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"type":"ready"}"#);
        assert_eq!(
            lines[1],
            r#"{"type":"branches","branches":[{"name":"origin/main","kind":"remote"}]}"#
        );
    }

    #[test]
    fn serve_reports_open_failure_and_stops() {
        let output = serve_to_string(
            Err(AccessError::Remote("no repository".to_string())),
            "{\"type\":\"branches_containing\",\"revision\":\"c1\"}\n",
        );
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("\"type\":\"error\""));
    }

    #[test]
    fn serve_turns_query_failures_into_error_responses() {
        let repo = FakeRepository::new().failing("c1");
        let output = serve_to_string(
            Ok(repo),
            "{\"type\":\"branches_containing\",\"revision\":\"c1\"}\nnonsense\n",
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("\"type\":\"error\""));
        assert!(lines[2].contains("malformed request"));
    }

    #[test]
    fn session_decodes_branches() {
        let responses = concat!(
            "{\"type\":\"ready\"}\n",
            "{\"type\":\"branches\",\"branches\":[{\"name\":\"origin/main\",\"kind\":\"remote\"}]}\n",
        );
        let mut sent = Vec::new();
        let mut session = Session::new(Cursor::new(responses), &mut sent);
        session.handshake().unwrap();

        let branches = session.branch_refs_containing("c1").unwrap();
        assert_eq!(branches, vec![BranchRef::remote("origin/main")]);
        drop(session);

        let sent = String::from_utf8(sent).unwrap();
        assert_eq!(
            sent.trim_end(),
            r#"{"type":"branches_containing","revision":"c1"}"#
        );
    }

    #[test]
    fn session_maps_agent_errors() {
        let responses = "{\"type\":\"error\",\"message\":\"bad revision\"}\n";
        let mut session = Session::new(Cursor::new(responses), Vec::new());
        match session.branch_refs_containing("zzz") {
            Err(AccessError::Remote(message)) => assert_eq!(message, "bad revision"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn session_reports_closed_connection() {
        let mut session = Session::new(Cursor::new(""), Vec::new());
        assert!(matches!(
            session.handshake(),
            Err(AccessError::Protocol(_))
        ));
    }

    #[test]
    fn plain_paths_are_shell_safe() {
        assert!(is_shell_safe(Path::new("/srv/agent/workspace/job-42")));
        assert!(is_shell_safe(Path::new("/var/lib/ci/ws_1.2@main")));
    }

    #[test]
    fn paths_a_remote_shell_would_split_are_flagged() {
        assert!(!is_shell_safe(Path::new("/srv/my workspace")));
        assert!(!is_shell_safe(Path::new("/srv/ws;rm")));
        assert!(!is_shell_safe(Path::new("/srv/$JOB")));
        assert!(!is_shell_safe(Path::new("/srv/'quoted'")));
        assert!(!is_shell_safe(Path::new("")));
    }

    #[test]
    fn spawn_with_empty_launcher_fails() {
        let result = RemoteAccessor::spawn(&[], Path::new("/tmp"));
        assert!(matches!(result, Err(AccessError::Transport(_))));
    }
}
