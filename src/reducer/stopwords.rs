/// High-frequency Bahasa Indonesia function words dropped before stemming.
pub const INDONESIAN_STOPWORDS: &[&str] = &[
    "ada", "adalah", "agak", "agar", "akan", "amat", "anda", "antara", "anu", "apakah",
    "apalagi", "atau", "bagaimanapun", "bagi", "bahwa", "begitu", "belum", "bisa", "boleh",
    "dahulu", "dalam", "dan", "dapat", "dari", "daripada", "demi", "demikian", "dengan", "di",
    "dia", "dimana", "dll", "dsb", "dst", "dua", "dulunya", "guna", "hal", "hanya", "harus",
    "ia", "ingin", "ini", "itu", "itulah", "jika", "juga", "kah", "kami", "karena", "ke",
    "kecuali", "kemana", "kembali", "kenapa", "kepada", "ketika", "kita", "lagi", "lain",
    "maka", "mari", "masih", "melainkan", "mengapa", "menurut", "mereka", "namun", "nanti",
    "nggak", "oh", "ok", "oleh", "pada", "para", "pasti", "pula", "pun", "saat", "saja",
    "sambil", "sampai", "saya", "sebab", "sebagai", "sebelum", "sebetulnya", "secara",
    "sedangkan", "seharusnya", "sehingga", "sekitar", "selagi", "selain", "sementara",
    "seolah", "seperti", "seraya", "serta", "sesuatu", "sesudah", "setelah", "seterusnya",
    "setiap", "setidaknya", "sudah", "supaya", "tanpa", "tapi", "telah", "tentang", "tentu",
    "terhadap", "tetapi", "tidak", "toh", "tolong", "untuk", "walau", "ya", "yaitu", "yakni",
    "yang",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_is_lowercase_and_unique() {
        let unique: HashSet<_> = INDONESIAN_STOPWORDS.iter().collect();
        assert_eq!(unique.len(), INDONESIAN_STOPWORDS.len());
        assert!(INDONESIAN_STOPWORDS
            .iter()
            .all(|word| word.chars().all(|ch| ch.is_ascii_lowercase())));
    }
}
