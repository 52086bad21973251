/// Download collaborator
///
/// Desktop rendition of the per-record "save" action: copy each
/// record's source file into a destination folder. One side effect
/// per record; sources that are not local files (the demo URLs) are
/// skipped, and individual copy failures are logged without aborting
/// the rest of the batch.

use std::path::Path;

use crate::state::data::ImageRecord;

/// Copy records into `dest`. Returns how many files were written.
pub fn export_records(records: &[ImageRecord], dest: &Path) -> usize {
    let mut copied = 0;

    for record in records {
        let source = Path::new(&record.src);
        if !source.is_file() {
            println!("⏭️  Skipping non-file source: {}", record.name);
            continue;
        }

        let target = dest.join(&record.name);
        match std::fs::copy(source, &target) {
            Ok(_) => copied += 1,
            Err(err) => eprintln!("⚠️  Could not export {}: {err}", record.name),
        }
    }

    println!("💾 Exported {copied} of {} images to {}", records.len(), dest.display());
    copied
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("photo-cull-test-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_exports_local_files_and_skips_urls() {
        let src_dir = scratch_dir("src");
        let dest_dir = scratch_dir("dest");

        let file = src_dir.join("shot.jpg");
        fs::write(&file, b"not really a jpeg").unwrap();

        let records = vec![
            ImageRecord::new(file.to_string_lossy(), "shot.jpg", 80),
            ImageRecord::new("https://example.com/remote.jpg", "remote.jpg", 60),
            ImageRecord::new(src_dir.join("missing.jpg").to_string_lossy(), "missing.jpg", 40),
        ];

        let copied = export_records(&records, &dest_dir);
        assert_eq!(copied, 1);
        assert!(dest_dir.join("shot.jpg").is_file());
        assert!(!dest_dir.join("remote.jpg").exists());

        fs::remove_dir_all(src_dir).ok();
        fs::remove_dir_all(dest_dir).ok();
    }
}
