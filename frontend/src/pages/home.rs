//! Landing page: doctor and testimonial carousels, the FAQ and the public
//! article listing.

use std::sync::Arc;

use sehat_shared::ArticleFilters;
use tokio::sync::watch;

use crate::{
    api::Api,
    components::{carousel::CarouselController, faq::Accordion},
    config::ClientConfig,
    search::SearchController,
};

/// Featured doctor slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doctor {
    /// Full name.
    pub name: &'static str,
    /// Specialisation line.
    pub specialization: &'static str,
    /// Portrait path on the site.
    pub image: &'static str,
    /// Quote shown beside the portrait.
    pub quote: &'static str,
}

/// Doctor carousel slides.
pub const DOCTORS: [Doctor; 2] = [
    Doctor {
        name: "Dr. Terawan Agus Putranto",
        specialization: "Spesialisasi: Radiologi dan Terapi Inovatif",
        image: "/Doktor1.webp",
        quote: "Kesehatan adalah investasi terbesar dalam hidup. Jangan pernah abaikan sinyal dari tubuh Anda, karena tubuh yang sehat adalah kunci kebahagiaan sejati.",
    },
    Doctor {
        name: "Dr. Siti Fadilah Supari",
        specialization: "Spesialisasi: Penyakit Dalam dan Kesehatan Publik",
        image: "/Doktor2.webp",
        quote: "Pencegahan lebih baik daripada pengobatan. Dengan edukasi kesehatan yang baik, kita dapat memutus rantai penyakit sebelum terlambat.",
    },
];

/// Reader testimonial slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Testimonial {
    /// Reader name.
    pub name: &'static str,
    /// Reader role.
    pub role: &'static str,
    /// Avatar URL.
    pub image: &'static str,
    /// Stars out of five.
    pub rating: u8,
    /// Testimonial text.
    pub text: &'static str,
}

/// Testimonial carousel slides.
pub const TESTIMONIALS: [Testimonial; 4] = [
    Testimonial {
        name: "Dewi Sartika",
        role: "Pembaca Setia",
        image: "https://randomuser.me/api/portraits/women/44.jpg",
        rating: 5,
        text: "Artikel-artikelnya sangat bermanfaat dan mudah dipahami. Saya jadi lebih paham cara menjaga kesehatan keluarga berkat blog ini!",
    },
    Testimonial {
        name: "Ahmad Rizky",
        role: "Pembaca Aktif",
        image: "https://randomuser.me/api/portraits/men/32.jpg",
        rating: 5,
        text: "Informasi yang disajikan sangat akurat dan up-to-date. Referensi terpercaya untuk tips kesehatan sehari-hari.",
    },
    Testimonial {
        name: "Sarah Amelia",
        role: "Subscriber Newsletter",
        image: "https://randomuser.me/api/portraits/women/68.jpg",
        rating: 5,
        text: "Newsletter mingguannya selalu ditunggu! Kontennya berkualitas dan sudah membantu saya menerapkan pola hidup sehat.",
    },
    Testimonial {
        name: "Budi Santoso",
        role: "Pembaca",
        image: "https://randomuser.me/api/portraits/men/52.jpg",
        rating: 5,
        text: "Blog kesehatan terbaik yang pernah saya baca. Penjelasannya detail tapi tidak membingungkan. Sangat recommended!",
    },
];

/// FAQ item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqEntry {
    /// Question.
    pub question: &'static str,
    /// Answer.
    pub answer: &'static str,
}

/// FAQ items in display order.
pub const FAQ: [FaqEntry; 5] = [
    FaqEntry {
        question: "Siapa yang menulis artikel di blog ini?",
        answer: "Artikel kami ditulis oleh tim penulis kesehatan berpengalaman yang bekerja sama dengan praktisi medis untuk memastikan akurasi informasi. Setiap artikel melewati proses review ketat sebelum dipublikasikan.",
    },
    FaqEntry {
        question: "Apakah informasi di blog ini dapat dipercaya?",
        answer: "Ya, kami berkomitmen menyajikan informasi kesehatan yang akurat dan berbasis bukti ilmiah. Setiap artikel dilengkapi referensi dari jurnal medis dan sumber terpercaya lainnya.",
    },
    FaqEntry {
        question: "Bagaimana cara berlangganan newsletter?",
        answer: "Anda dapat berlangganan newsletter kami dengan memasukkan email di form yang tersedia di halaman utama atau di bagian bawah setiap halaman. Newsletter dikirim seminggu sekali berisi artikel-artikel terpilih.",
    },
    FaqEntry {
        question: "Apakah saya bisa berkontribusi menulis artikel?",
        answer: "Tentu! Kami menerima kontribusi artikel dari penulis tamu. Silakan hubungi kami melalui halaman kontak untuk informasi lebih lanjut tentang panduan penulisan dan proses submit artikel.",
    },
    FaqEntry {
        question: "Apakah blog ini menggantikan konsultasi dokter?",
        answer: "Tidak. Informasi di blog ini bersifat edukatif dan tidak menggantikan konsultasi medis profesional. Untuk masalah kesehatan spesifik, selalu konsultasikan dengan dokter atau tenaga medis yang berkompeten.",
    },
];

/// Everything the landing page drives. Dropping it stops both autoplay
/// timers and any pending search.
pub struct HomePage {
    /// Doctor carousel.
    pub doctors: CarouselController,
    /// Testimonial carousel.
    pub testimonials: CarouselController,
    /// Published article listing.
    pub articles: SearchController,
    faq: watch::Sender<Accordion>,
}

impl HomePage {
    /// Start the carousels; the listing is fetched by [`HomePage::load`].
    pub fn mount(api: Api, config: &ClientConfig) -> Self {
        let (faq, _) = watch::channel(Accordion::new(FAQ.len()));
        Self {
            doctors: CarouselController::mount(
                DOCTORS.len(),
                config.autoplay_interval,
                config.swipe_threshold,
            ),
            testimonials: CarouselController::mount(
                TESTIMONIALS.len(),
                config.autoplay_interval,
                config.swipe_threshold,
            ),
            articles: SearchController::new(
                Arc::new(api),
                ArticleFilters::published(),
                config.search_debounce,
            ),
            faq,
        }
    }

    /// Fetch the published listing.
    pub async fn load(&self) {
        self.articles.refresh().await;
    }

    /// Doctor on the current slide.
    pub fn current_doctor(&self) -> &'static Doctor {
        &DOCTORS[self.doctors.state().index()]
    }

    /// Testimonial on the current slide.
    pub fn current_testimonial(&self) -> &'static Testimonial {
        &TESTIMONIALS[self.testimonials.state().index()]
    }

    /// FAQ state updates.
    pub fn subscribe_faq(&self) -> watch::Receiver<Accordion> {
        self.faq.subscribe()
    }

    /// Current FAQ state.
    pub fn faq(&self) -> Accordion {
        self.faq.borrow().clone()
    }

    /// Open item `index`, or close it when already open.
    pub fn toggle_faq(&self, index: usize) {
        self.faq.send_modify(|faq| faq.toggle(index));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::{
        http::{HttpResponse, Method},
        testing::Harness,
    };

    #[tokio::test(start_paused = true)]
    async fn carousels_autoplay_on_mount() {
        let harness = Harness::new();
        let home = HomePage::mount(harness.api.clone(), &harness.config);
        assert_eq!(home.current_doctor().name, DOCTORS[0].name);

        tokio::time::sleep(harness.config.autoplay_interval + Duration::from_millis(10)).await;

        assert_eq!(home.current_doctor().name, DOCTORS[1].name);
        assert_eq!(home.current_testimonial().name, TESTIMONIALS[1].name);
    }

    #[tokio::test]
    async fn listing_requests_published_articles_only() {
        let harness = Harness::new();
        harness
            .transport
            .on(Method::Get, "/articles", HttpResponse::json(200, &json!([])));
        let home = HomePage::mount(harness.api.clone(), &harness.config);

        home.load().await;

        let request = &harness.transport.requests_to(Method::Get, "/articles")[0];
        assert_eq!(request.url, "http://mock.local/api/articles?status=published");
        assert!(request.header("authorization").is_none());
    }

    #[tokio::test]
    async fn faq_starts_with_first_item_open() {
        let harness = Harness::new();
        let home = HomePage::mount(harness.api.clone(), &harness.config);
        assert!(home.faq().is_open(0));

        home.toggle_faq(2);
        assert_eq!(home.faq().open(), Some(2));
        home.toggle_faq(2);
        assert_eq!(home.faq().open(), None);
    }
}
