//! Vietnamese word segmentation.
//!
//! Vietnamese is written with spaces between syllables, not between words:
//! `"bài giảng"` is one word of two syllables. This tokenizer
//! first splits text into syllables on Unicode word boundaries (UAX #29),
//! then greedily joins runs of syllables that form a known compound,
//! longest match first. A compound is emitted as a single token whose text
//! keeps the syllables separated by one space.
//!
//! # Examples
//!
//! ```
//! use lectern::analysis::tokenizer::Tokenizer;
//! use lectern::analysis::tokenizer::vietnamese::VietnameseTokenizer;
//!
//! let tokenizer = VietnameseTokenizer::new();
//! let tokens: Vec<_> = tokenizer
//!     .tokenize("bài giảng về cấu trúc dữ liệu")
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//!
//! // "cấu trúc dữ liệu" is itself a known compound and beats "cấu trúc" + "dữ liệu"
//! assert_eq!(tokens, vec!["bài giảng", "về", "cấu trúc dữ liệu"]);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Common multi-syllable Vietnamese words.
///
/// Entries are lowercase, with syllables separated by one space.
const DEFAULT_VIETNAMESE_COMPOUNDS: &[&str] = &[
    // education
    "bài giảng",
    "bài tập",
    "bài học",
    "bài kiểm tra",
    "giáo trình",
    "giáo viên",
    "giảng viên",
    "học sinh",
    "sinh viên",
    "học kỳ",
    "học phần",
    "môn học",
    "khóa học",
    "lớp học",
    "trường học",
    "đại học",
    "giáo dục",
    "đào tạo",
    "nghiên cứu",
    "luận văn",
    "khoa học",
    "kiến thức",
    "kỳ thi",
    "điểm số",
    "nâng cao",
    "cơ bản",
    "chủ đề",
    // computing
    "giải thuật",
    "thuật toán",
    "cấu trúc",
    "dữ liệu",
    "cơ sở dữ liệu",
    "cấu trúc dữ liệu",
    "sắp xếp",
    "tìm kiếm",
    "độ phức tạp",
    "phức tạp",
    "nhị phân",
    "cây nhị phân",
    "lập trình",
    "ngôn ngữ",
    "phần mềm",
    "phần cứng",
    "máy tính",
    "mạng máy tính",
    "hệ thống",
    "hệ điều hành",
    "ứng dụng",
    "công nghệ",
    "thông tin",
    "trí tuệ nhân tạo",
    "học máy",
    "mô hình",
    "kiểm thử",
    "bảo mật",
    "mã nguồn",
    "triển khai",
    "chi tiết",
    "phân tích",
    "thiết kế",
    "kiến trúc",
    "giao diện",
    "người dùng",
    "tài khoản",
    "mật khẩu",
    // business and meetings
    "cuộc họp",
    "biên bản",
    "biên bản cuộc họp",
    "thảo luận",
    "báo cáo",
    "kế hoạch",
    "dự án",
    "tiến độ",
    "nhiệm vụ",
    "công việc",
    "công ty",
    "doanh nghiệp",
    "khách hàng",
    "hợp đồng",
    "tài liệu",
    "văn bản",
    "quản lý",
    "nhân viên",
    "nhân sự",
    "tài chính",
    "ngân sách",
    "kế toán",
    "doanh thu",
    "lợi nhuận",
    "chi phí",
    "hóa đơn",
    "ngân hàng",
    "kinh tế",
    "thị trường",
    "sản phẩm",
    "dịch vụ",
    "chiến lược",
    "mục tiêu",
    "kết quả",
    "đánh giá",
    "đề xuất",
    "quyết định",
    "thông báo",
    "hướng dẫn",
    "quy trình",
    "quy định",
    "chính sách",
    "pháp luật",
    "luật sư",
    // general
    "bao gồm",
    "chúng ta",
    "chúng tôi",
    "vấn đề",
    "giải pháp",
    "phương pháp",
    "ví dụ",
    "thời gian",
    "địa điểm",
    "tổng quan",
    "giới thiệu",
    "kết luận",
    "nội dung",
    "thực hiện",
    "sử dụng",
    "xây dựng",
    "phát triển",
    "cải thiện",
    "tối ưu",
    "hiệu suất",
    "hiệu quả",
    "chất lượng",
    "số lượng",
    "việt nam",
    "hà nội",
    "thành phố",
    "hồ chí minh",
    "thành phố hồ chí minh",
    "sức khỏe",
    "y tế",
    "bệnh viện",
    "bác sĩ",
    "môi trường",
    "xã hội",
    "văn hóa",
    "lịch sử",
    "địa lý",
    "toán học",
    "vật lý",
    "hóa học",
    "sinh học",
];

/// Default compound dictionary as a HashSet.
pub static DEFAULT_VIETNAMESE_COMPOUNDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_VIETNAMESE_COMPOUNDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// A syllable with its byte offsets in the input.
struct Syllable<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

/// Dictionary-driven longest-match segmenter for Vietnamese.
#[derive(Clone, Debug)]
pub struct VietnameseTokenizer {
    compounds: Arc<HashSet<String>>,
    /// Longest compound in the dictionary, in syllables.
    max_syllables: usize,
}

impl VietnameseTokenizer {
    /// Create a tokenizer backed by the built-in compound dictionary.
    pub fn new() -> Self {
        Self::with_compounds(DEFAULT_VIETNAMESE_COMPOUNDS_SET.clone())
    }

    /// Create a tokenizer with a custom compound dictionary.
    ///
    /// Entries are lowercased and whitespace-normalized before use.
    pub fn with_compounds<I, S>(compounds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compounds: HashSet<String> = compounds
            .into_iter()
            .map(|word| {
                word.as_ref()
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|word| !word.is_empty())
            .collect();

        let max_syllables = compounds
            .iter()
            .map(|word| word.split(' ').count())
            .max()
            .unwrap_or(1);

        VietnameseTokenizer {
            compounds: Arc::new(compounds),
            max_syllables,
        }
    }

    /// Extend the dictionary with additional compounds.
    pub fn extend_compounds<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let merged: Vec<String> = self
            .compounds
            .iter()
            .cloned()
            .chain(extra.into_iter().map(|s| s.as_ref().to_string()))
            .collect();
        Self::with_compounds(merged)
    }

    /// Number of compounds known to this tokenizer.
    pub fn dictionary_size(&self) -> usize {
        self.compounds.len()
    }

    fn syllables(text: &str) -> Vec<Syllable<'_>> {
        text.split_word_bound_indices()
            .filter(|(_, segment)| segment.chars().any(|c| c.is_alphanumeric()))
            .map(|(start, segment)| Syllable {
                text: segment,
                start,
                end: start + segment.len(),
            })
            .collect()
    }

    /// Length in syllables of the longest dictionary compound starting at `start`.
    fn longest_match(&self, syllables: &[Syllable<'_>], start: usize) -> usize {
        let limit = self.max_syllables.min(syllables.len() - start);
        let mut key = String::new();
        let mut best = 1;

        for len in 1..=limit {
            if len > 1 {
                key.push(' ');
            }
            key.push_str(&syllables[start + len - 1].text.to_lowercase());
            if len > 1 && self.compounds.contains(&key) {
                best = len;
            }
        }

        best
    }
}

impl Default for VietnameseTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for VietnameseTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let syllables = Self::syllables(text);
        let mut tokens = Vec::with_capacity(syllables.len());
        let mut index = 0;

        while index < syllables.len() {
            let len = self.longest_match(&syllables, index);
            let word = syllables[index..index + len]
                .iter()
                .map(|s| s.text)
                .collect::<Vec<_>>()
                .join(" ");

            tokens.push(Token::with_offsets(
                word,
                tokens.len(),
                syllables[index].start,
                syllables[index + len - 1].end,
            ));
            index += len;
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "vietnamese"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokenizer: &VietnameseTokenizer, text: &str) -> Vec<String> {
        tokenizer.tokenize(text).unwrap().map(|t| t.text).collect()
    }

    #[test]
    fn test_compound_segmentation() {
        let tokenizer = VietnameseTokenizer::new();
        assert_eq!(
            words(&tokenizer, "bài giảng này bao gồm các thuật toán sắp xếp"),
            vec!["bài giảng", "này", "bao gồm", "các", "thuật toán", "sắp xếp"]
        );
    }

    #[test]
    fn test_longest_match_wins() {
        let tokenizer = VietnameseTokenizer::new();
        assert_eq!(
            words(&tokenizer, "cơ sở dữ liệu phân tán"),
            vec!["cơ sở dữ liệu", "phân", "tán"]
        );
    }

    #[test]
    fn test_nested_compounds() {
        let tokenizer = VietnameseTokenizer::new();
        assert_eq!(
            words(&tokenizer, "bài giảng về cấu trúc dữ liệu"),
            vec!["bài giảng", "về", "cấu trúc dữ liệu"]
        );
        assert_eq!(
            words(&tokenizer, "cấu trúc và dữ liệu"),
            vec!["cấu trúc", "và", "dữ liệu"]
        );
    }

    #[test]
    fn test_case_insensitive_lookup_keeps_original_text() {
        let tokenizer = VietnameseTokenizer::new();
        assert_eq!(words(&tokenizer, "Cây Nhị Phân"), vec!["Cây Nhị Phân"]);
    }

    #[test]
    fn test_offsets_cover_compound() {
        let tokenizer = VietnameseTokenizer::new();
        let text = "học sinh giỏi";
        let tokens: Vec<Token> = tokenizer.tokenize(text).unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(&text[tokens[0].start_offset..tokens[0].end_offset], "học sinh");
        assert_eq!(tokens[1].position, 1);
    }

    #[test]
    fn test_custom_dictionary() {
        let tokenizer = VietnameseTokenizer::with_compounds(["Phân  Tán"]);
        assert_eq!(words(&tokenizer, "hệ phân tán"), vec!["hệ", "phân tán"]);

        let extended = tokenizer.extend_compounds(["hệ phân tán"]);
        assert_eq!(words(&extended, "hệ phân tán"), vec!["hệ phân tán"]);
        assert_eq!(extended.dictionary_size(), 2);
    }

    #[test]
    fn test_skips_punctuation_and_whitespace() {
        let tokenizer = VietnameseTokenizer::new();
        assert_eq!(words(&tokenizer, "  dự án ,  mới "), vec!["dự án", "mới"]);
    }
}
