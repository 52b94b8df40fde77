/// Indonesian root words that must never be affix-stripped.
///
/// Drawn from the Sastrawi root-word dictionary. The table favours frequent
/// roots whose leading or trailing letters look like an affix (`pe-`, `per-`,
/// `ber-`, `me-`, `ke-`, `ter-`, `di-`, `-an`, `-i`), plus the roots that nasal
/// prefixes are recoded back into.
pub const INDONESIAN_ROOT_WORDS: &[&str] = &[
    // pe- / per-
    "pedas", "pedang", "pegang", "pegawai", "pekan", "pelan", "peluang", "peluru", "pena",
    "pendek", "pengaruh", "pensil", "penting", "penuh", "penjara", "peran", "perahu", "perak",
    "percaya", "perempuan", "pergi", "perintah", "periksa", "perlu", "permata", "permisi",
    "pernah", "persen", "pertama", "perut", "pesan", "pesawat", "pesta", "peta", "petang",
    "petir", "pelangi", "pelita", "penyu",
    // be- / ber-
    "beban", "bebas", "bebek", "beda", "bekal", "bekas", "belah", "belanja", "belas", "beli",
    "belimbing", "benar", "benang", "bencana", "benci", "benda", "bendera", "benih", "bensin",
    "bentuk", "benua", "berapa", "berani", "beras", "berat", "beres", "berita", "bersih",
    "besar", "besi", "betul", "betina",
    // me- / men- / mem-
    "medan", "media", "meja", "mekar", "melati", "menang", "mengerti", "mentah", "mentega",
    "merah", "merdeka", "mesin", "mesra", "mewah", "memang",
    // ke-
    "kebun", "kecil", "kedai", "keju", "keluarga", "kelas", "kemarin", "kembang", "kemudi",
    "kepala", "kepiting", "keras", "kereta", "kering", "kertas", "ketua", "kelapa",
    // ter- / di-
    "terang", "terbang", "terima", "terus", "teras", "dinding", "dingin", "dinas", "dini",
    "diri", "diam",
    // roots ending in -an / -i / -kan
    "ikan", "jalan", "hujan", "bulan", "teman", "taman", "tahan", "makan", "minum", "tangan",
    "badan", "hutan", "ladang", "pantai", "pagi", "nyanyi", "tani", "sendiri", "hati", "mati",
    "padi", "roti", "kopi", "sapi", "api", "mimpi", "bumi", "kunci", "kursi", "gigi", "seni",
    "bunyi", "sepi",
    // recoding targets and common content roots
    "ajar", "ambil", "baca", "bawa", "buku", "cerah", "cuaca", "dengar", "didih", "gonggong",
    "jawab", "kerja", "kirim", "kucing", "lucu", "main", "masak", "mobil", "nasi", "pakai",
    "pukul", "pustaka", "rumah", "sapu", "sekolah", "tulis", "tanya", "anjing", "air",
    "derajat", "seratus", "suka", "tahu",
];
