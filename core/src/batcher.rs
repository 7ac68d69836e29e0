//! Turns tokens into invocations.

use crate::config::RunConfig;
use crate::invocation::Invocation;

/// How many tokens go into one invocation, and where they go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchPolicy {
    /// One token per invocation. With a replacement token the captured token
    /// is spliced into the template, otherwise it is appended.
    Single { replacement: Option<String> },
    /// `size` tokens appended per invocation, the last one possibly shorter.
    Grouped { size: usize },
}

impl BatchPolicy {
    pub fn from_config(cfg: &RunConfig) -> Self {
        match (cfg.replacement(), cfg.max_args()) {
            (Some(token), _) => BatchPolicy::Single {
                replacement: Some(token.to_string()),
            },
            (None, 1) => BatchPolicy::Single { replacement: None },
            (None, size) => BatchPolicy::Grouped { size },
        }
    }
}

/// Accumulates tokens and emits invocations as soon as they are complete.
///
/// The template is cloned into every invocation and never modified.
#[derive(Debug)]
pub struct Batcher {
    template: Vec<String>,
    policy: BatchPolicy,
    pending: Vec<String>,
}

impl Batcher {
    pub fn new(template: Vec<String>, policy: BatchPolicy) -> Self {
        let pending = match &policy {
            BatchPolicy::Grouped { size } => Vec::with_capacity(*size),
            BatchPolicy::Single { .. } => Vec::new(),
        };
        Self {
            template,
            policy,
            pending,
        }
    }

    pub fn from_config(cfg: &RunConfig) -> Self {
        Self::new(cfg.command().to_vec(), BatchPolicy::from_config(cfg))
    }

    /// Feeds one token; returns an invocation when this token completes one.
    pub fn push(&mut self, token: String) -> Option<Invocation> {
        match &self.policy {
            BatchPolicy::Single {
                replacement: Some(replacement),
            } => Some(Invocation::new(
                self.template
                    .iter()
                    .map(|arg| {
                        if arg.contains(replacement.as_str()) {
                            arg.replace(replacement.as_str(), &token)
                        } else {
                            arg.clone()
                        }
                    })
                    .collect(),
            )),
            BatchPolicy::Single { replacement: None } => {
                let mut argv = Vec::with_capacity(self.template.len() + 1);
                argv.extend_from_slice(&self.template);
                argv.push(token);
                Some(Invocation::new(argv))
            }
            BatchPolicy::Grouped { size } => {
                let size = *size;
                self.pending.push(token);
                if self.pending.len() == size {
                    Some(self.drain_pending())
                } else {
                    None
                }
            }
        }
    }

    /// Flushes a partial group at end of input.
    pub fn finish(&mut self) -> Option<Invocation> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.drain_pending())
        }
    }

    /// Tokens held back waiting for their group to fill.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn drain_pending(&mut self) -> Invocation {
        let mut argv = Vec::with_capacity(self.template.len() + self.pending.len());
        argv.extend_from_slice(&self.template);
        argv.append(&mut self.pending);
        Invocation::new(argv)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn run(template: &[&str], policy: BatchPolicy, tokens: &[&str]) -> Vec<Vec<String>> {
        let mut batcher = Batcher::new(strings(template), policy);
        let mut out: Vec<Vec<String>> = tokens
            .iter()
            .filter_map(|t| batcher.push(t.to_string()))
            .map(Invocation::into_argv)
            .collect();
        out.extend(batcher.finish().map(Invocation::into_argv));
        out
    }

    #[test]
    fn single_appends_token() {
        let got = run(
            &["grep", "foo"],
            BatchPolicy::Single { replacement: None },
            &["file1.txt", "file2.txt"],
        );
        assert_eq!(
            got,
            vec![
                strings(&["grep", "foo", "file1.txt"]),
                strings(&["grep", "foo", "file2.txt"]),
            ]
        );
    }

    #[test]
    fn single_replaces_one_occurrence() {
        let got = run(
            &["mv", "{}", "/tmp/"],
            BatchPolicy::Single {
                replacement: Some("{}".into()),
            },
            &["file1.txt", "file2.txt"],
        );
        assert_eq!(
            got,
            vec![
                strings(&["mv", "file1.txt", "/tmp/"]),
                strings(&["mv", "file2.txt", "/tmp/"]),
            ]
        );
    }

    #[test]
    fn single_replaces_every_occurrence() {
        let got = run(
            &["mv", "{}", "{}.bck"],
            BatchPolicy::Single {
                replacement: Some("{}".into()),
            },
            &["file1.txt", "file2.txt"],
        );
        assert_eq!(
            got,
            vec![
                strings(&["mv", "file1.txt", "file1.txt.bck"]),
                strings(&["mv", "file2.txt", "file2.txt.bck"]),
            ]
        );
    }

    #[test]
    fn replacement_repeated_inside_one_argument() {
        let got = run(
            &["echo", "{}-{}"],
            BatchPolicy::Single {
                replacement: Some("{}".into()),
            },
            &["x"],
        );
        assert_eq!(got, vec![strings(&["echo", "x-x"])]);
    }

    #[test]
    fn replacement_without_match_appends_nothing() {
        let got = run(
            &["true"],
            BatchPolicy::Single {
                replacement: Some("%".into()),
            },
            &["a", "b"],
        );
        assert_eq!(got, vec![strings(&["true"]), strings(&["true"])]);
    }

    #[test]
    fn single_counts_empty_tokens() {
        let got = run(
            &["echo"],
            BatchPolicy::Single { replacement: None },
            &["", "a", ""],
        );
        assert_eq!(got.len(), 3);
        assert_eq!(got[0], strings(&["echo", ""]));
    }

    #[test]
    fn grouped_flushes_short_tail() {
        let got = run(&["echo"], BatchPolicy::Grouped { size: 2 }, &["a", "b", "c"]);
        assert_eq!(got, vec![strings(&["echo", "a", "b"]), strings(&["echo", "c"])]);
    }

    #[test]
    fn grouped_exact_multiple_has_no_tail() {
        let got = run(
            &["grep", "foo"],
            BatchPolicy::Grouped { size: 2 },
            &["file1.txt", "file2.txt", "file3.txt", "file4.txt"],
        );
        assert_eq!(
            got,
            vec![
                strings(&["grep", "foo", "file1.txt", "file2.txt"]),
                strings(&["grep", "foo", "file3.txt", "file4.txt"]),
            ]
        );
    }

    #[test]
    fn grouped_fewer_tokens_than_size() {
        let got = run(&["grep", "foo"], BatchPolicy::Grouped { size: 2 }, &["file1.txt"]);
        assert_eq!(got, vec![strings(&["grep", "foo", "file1.txt"])]);
    }

    #[test]
    fn grouped_invocation_count_is_ceiling() {
        let tokens: Vec<String> = (0..23).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        for size in 1..=7usize {
            let got = run(&["cmd"], BatchPolicy::Grouped { size }, &refs);
            assert_eq!(got.len(), refs.len().div_ceil(size), "size {size}");
            let appended: Vec<String> = got.iter().flat_map(|argv| argv[1..].to_vec()).collect();
            assert_eq!(appended, tokens, "size {size}");
        }
    }

    #[test]
    fn no_tokens_no_invocations() {
        assert!(run(&["echo"], BatchPolicy::Grouped { size: 3 }, &[]).is_empty());
        assert!(run(&["echo"], BatchPolicy::Single { replacement: None }, &[]).is_empty());
    }

    #[test]
    fn pending_tracks_partial_group() {
        let mut batcher = Batcher::new(strings(&["echo"]), BatchPolicy::Grouped { size: 3 });
        assert!(batcher.push("a".into()).is_none());
        assert!(batcher.push("b".into()).is_none());
        assert_eq!(batcher.pending(), 2);
        assert!(batcher.push("c".into()).is_some());
        assert_eq!(batcher.pending(), 0);
        assert!(batcher.finish().is_none());
    }

    #[test]
    fn policy_from_config() {
        let cfg = RunConfig::builder(["echo"]).max_args(4).build().unwrap();
        assert_eq!(BatchPolicy::from_config(&cfg), BatchPolicy::Grouped { size: 4 });

        let cfg = RunConfig::builder(["echo"]).build().unwrap();
        assert_eq!(
            BatchPolicy::from_config(&cfg),
            BatchPolicy::Single { replacement: None }
        );

        let cfg = RunConfig::builder(["echo", "{}"])
            .max_args(4)
            .replacement(Some("{}".into()))
            .build()
            .unwrap();
        assert_eq!(
            BatchPolicy::from_config(&cfg),
            BatchPolicy::Single {
                replacement: Some("{}".into())
            }
        );
    }
}
