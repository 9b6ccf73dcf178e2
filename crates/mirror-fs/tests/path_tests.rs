use mirror_fs::NormalizedPath;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case("artist/song.mp3", "opus", "artist/song.opus")]
#[case("artist/song.MP3", "opus", "artist/song.opus")]
#[case("a.b/c.d.flac", "opus", "a.b/c.d.opus")]
#[case("cover.png", "jpeg", "cover.jpeg")]
#[case("./artist//song.flac", "opus", "artist/song.opus")]
fn test_with_extension(#[case] input: &str, #[case] ext: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).with_extension(ext).as_str(), expected);
}

#[rstest]
#[case("song.mp3", Some("mp3"))]
#[case("dir/song", None)]
#[case("dir/song.", Some(""))]
#[case("dir/.hidden.flac", Some("flac"))]
fn test_extension(#[case] input: &str, #[case] expected: Option<&str>) {
    assert_eq!(NormalizedPath::new(input).extension(), expected);
}

#[cfg(unix)]
#[test]
fn test_backslash_is_not_a_separator_on_unix() {
    let path = NormalizedPath::new("AC\\DC/Back in Black.flac");
    assert_eq!(path.as_str(), "AC\\DC/Back in Black.flac");
    assert_eq!(path.with_extension("opus").as_str(), "AC\\DC/Back in Black.opus");
}

proptest! {
    #[test]
    fn test_segments_round_trip(segments in prop::collection::vec("[A-Za-z0-9 _-][A-Za-z0-9 _.-]{0,7}", 1..5)) {
        let joined = segments.join("/");
        let path = NormalizedPath::new(&joined);
        prop_assert_eq!(path.as_str(), joined.as_str());
        let native = segments.iter().fold(std::path::PathBuf::from("/root"), |acc, s| acc.join(s));
        prop_assert_eq!(path.under(std::path::Path::new("/root")), native);
    }

    #[test]
    fn test_with_extension_sets_extension(stem in "[a-z]{1,8}(/[a-z]{1,8}){0,3}", ext in "[a-z0-9]{1,5}") {
        let path = NormalizedPath::new(format!("{stem}.wav"));
        let replaced = path.with_extension(&ext);
        prop_assert_eq!(replaced.extension(), Some(ext.as_str()));
        let expected = format!("{stem}.{ext}");
        prop_assert_eq!(replaced.as_str(), expected.as_str());
    }
}
