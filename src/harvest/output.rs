// src/harvest/output.rs
use crate::canon::Identity;
use crate::harvest::types::{Item, ItemClass};
use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `{out_dir}/{identity}_posts.txt` or `{out_dir}/{identity}_chats.txt`.
pub fn output_path(out_dir: &Path, identity: &Identity, class: ItemClass) -> PathBuf {
    let suffix = match class {
        ItemClass::Post => "posts",
        ItemClass::Comment => "chats",
    };
    out_dir.join(format!("{}_{}.txt", identity.as_str(), suffix))
}

/// Body text with CR removed and continuation lines indented under `body:`.
pub fn indent_body(s: &str) -> String {
    s.replace('\r', "")
        .split('\n')
        .collect::<Vec<_>>()
        .join("\n      ")
}

/// Render one item as a text block (terminated by a blank line).
pub fn render_block(item: &Item) -> String {
    let mut out = String::new();
    match item.class {
        ItemClass::Post => {
            out.push_str("Post:\n");
            out.push_str(&format!("  subreddit: r/{}\n", item.category_label));
            out.push_str(&format!(
                "  title: {}\n",
                item.title.as_deref().unwrap_or_default()
            ));
        }
        ItemClass::Comment => {
            out.push_str("Comment:\n");
            out.push_str(&format!("  subreddit: r/{}\n", item.category_label));
        }
    }
    let body = indent_body(&item.body);
    if !body.is_empty() {
        out.push_str("  body:\n");
        out.push_str(&format!("    {}\n", body));
    }
    out.push('\n');
    out
}

/// One per-identity, per-class output file. Truncated on open.
pub struct OutputSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl OutputSink {
    pub fn create(out_dir: &Path, identity: &Identity, class: ItemClass) -> Result<Self> {
        if !identity.is_file_safe() {
            bail!("refusing to write output for unsafe name {:?}", identity.as_str());
        }
        fs::create_dir_all(out_dir)
            .with_context(|| format!("creating output directory {}", out_dir.display()))?;
        let path = output_path(out_dir, identity, class);
        let file =
            File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut sink = Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        };
        let heading = match class {
            ItemClass::Post => "POSTS",
            ItemClass::Comment => "COMMENTS",
        };
        sink.write_raw(&format!("=== {} {} ===\n\n", identity, heading))?;
        Ok(sink)
    }

    fn write_raw(&mut self, s: &str) -> Result<()> {
        self.writer
            .write_all(s.as_bytes())
            .with_context(|| format!("writing {}", self.path.display()))
    }

    pub fn write_item(&mut self, item: &Item) -> Result<()> {
        self.write_raw(&render_block(item))?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close. Dropping without `finish` still closes the file but loses flush errors.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer
            .flush()
            .with_context(|| format!("flushing {}", self.path.display()))?;
        Ok(self.path)
    }
}
